//! Health check command - checks a running devicehub server.

use std::time::Duration;

use crate::cli::HealthArgs;

/// Health endpoint URL for a base URL (or the endpoint itself).
fn health_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with("/health") {
        base.to_string()
    } else {
        format!("{base}/health")
    }
}

/// Run the health check command
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let url = health_url(&args.url);
    let timeout = Duration::from_secs(args.timeout);

    let client = reqwest::Client::builder().timeout(timeout).build()?;

    match client.get(&url).send().await {
        Ok(response) => {
            let http_status = response.status();
            // An unhealthy store is reported as 503 with the same JSON body
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("");
            let backend = body.get("backend").and_then(|s| s.as_str()).unwrap_or("unknown");

            if http_status.is_success() && status == "healthy" {
                println!("healthy (backend: {backend})");
                Ok(())
            } else {
                eprintln!("unhealthy: HTTP {http_status}, backend {backend}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("unhealthy: failed to connect to {}: {}", url, e);
            std::process::exit(1);
        }
    }
}
