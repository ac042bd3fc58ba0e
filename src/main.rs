#[tokio::main]
async fn main() {
    if let Err(e) = barbershop_backend::run().await {
        eprintln!("barbershop-backend failed: {}", e);
        std::process::exit(1);
    }
}
