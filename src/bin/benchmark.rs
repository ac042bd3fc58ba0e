use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;
const BASE_URL: &str = "http://localhost:3000";
const BENCH_PASSWORD: &str = "benchmark-pass";

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<serde_json::Value>,
    bearer: Option<String>,
}

#[tokio::main]
async fn main() {
    println!("{}", "💈 Starting Barbershop Benchmark Suite".bold().green());
    println!("Target URL: {}", BASE_URL);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .cookie_store(true)
        .build()
        .unwrap();

    if client.get(format!("{}/health", BASE_URL)).send().await.is_err() {
        eprintln!("{}", "❌ Server is NOT reachable at localhost:3000. Please start it first.".red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let username = format!("bench-{}", Uuid::new_v4().simple());
    let (barber_id, token) = setup_barber(&client, &username).await;
    let bench_date = (Utc::now() + ChronoDuration::days(7)).format("%Y-%m-%d").to_string();
    setup_appointments(&client, &token, &bench_date).await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Barber:   {} ({})", username, barber_id);
    println!("   Date:     {}", bench_date);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", BASE_URL),
            body: None,
            bearer: None,
        },
        Target {
            name: "Service Catalog (Public Read)",
            method: "GET",
            url: format!("{}/api/public/services", BASE_URL),
            body: None,
            bearer: None,
        },
        Target {
            name: "Available Slots (Public Read)",
            method: "GET",
            url: format!("{}/api/public/available-slots?date={}&barber_id={}", BASE_URL, bench_date, barber_id),
            body: None,
            bearer: None,
        },
        Target {
            name: "List Appointments (Authenticated Read)",
            method: "GET",
            url: format!("{}/api/appointments?start_date={}&end_date={}", BASE_URL, bench_date, bench_date),
            body: None,
            bearer: Some(token.clone()),
        },
        Target {
            name: "Login Flow (Crypto Intensive)",
            method: "POST",
            url: format!("{}/api/auth/login", BASE_URL),
            body: Some(json!({
                "username": username,
                "password": BENCH_PASSWORD
            })),
            bearer: None,
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

async fn setup_barber(client: &Client, username: &str) -> (String, String) {
    let credentials = json!({
        "username": username,
        "password": BENCH_PASSWORD
    });

    let res = client.post(format!("{}/api/auth/register", BASE_URL))
        .json(&credentials)
        .send()
        .await
        .expect("Failed to send register request");

    if !res.status().is_success() {
        panic!("Failed to register barber: status {}", res.status());
    }

    let login_res = client.post(format!("{}/api/auth/login", BASE_URL))
        .json(&credentials)
        .send()
        .await
        .expect("Login failed during setup");

    if !login_res.status().is_success() {
        panic!("Login failed. Status: {}", login_res.status());
    }

    let body: Value = login_res.json().await.expect("Failed to parse login response");
    let id = body["user"]["id"].as_str().expect("No user id").to_string();
    let token = body["token"].as_str().expect("No token").to_string();
    (id, token)
}

async fn setup_appointments(client: &Client, token: &str, date: &str) {
    // Book every other morning slot so the slots endpoint has something to filter.
    for time in ["09:00", "10:00", "11:00"] {
        let res = client.post(format!("{}/api/appointments", BASE_URL))
            .bearer_auth(token)
            .json(&json!({
                "customer_name": "Bench Customer",
                "customer_phone": "555-0100",
                "appointment_date": date,
                "appointment_time": time,
                "service_ids": [1, 2]
            }))
            .send()
            .await
            .expect("Failed to create appointment");

        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().await.unwrap_or_default();
            panic!("Failed to create appointment data. Status: {}. Body: {}", status, txt);
        }
    }
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let method = target.method;
            let bearer = target.bearer.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = match method {
                    "GET" => {
                        let mut req = client.get(&url);
                        if let Some(t) = bearer {
                            req = req.bearer_auth(t);
                        }
                        req.send().await
                    },
                    "POST" => {
                        let mut req = client.post(&url);
                        if let Some(b) = body {
                            req = req.json(&b);
                        }
                        req.send().await
                    },
                    _ => client.get(&url).send().await,
                };
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}