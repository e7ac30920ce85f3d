//! Smoke test for the JSON endpoints of a configured Incidex server
//! Run with: cargo run --bin check_endpoints -- [config.toml]

use futures::future::join;
use incidex::api::IncidexClient;
use incidex::config::Config;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Incidex Endpoint Checks ===\n");

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load(),
    };
    println!("Server: {}", config.server.base_url);
    if config.server.session_cookie.is_none() {
        println!("(no session cookie configured, expect login redirects)");
    }
    println!();

    let client = IncidexClient::new(&config.server, config.settings.api_timeout)?;
    let (analysts, suggestion) = join(
        client.analysts_by_dept(),
        client.suggest("Printer offline", "The office printer does not respond"),
    )
    .await;

    let mut failures = 0;

    println!("--- GET /app/analysts/by-dept ---");
    match analysts {
        Ok(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            println!("✓ {} departments", keys.len());
            for key in keys {
                let names: Vec<&str> = map[key].iter().map(|a| a.name.as_str()).collect();
                println!("  {key}: {}", names.join(", "));
            }
        }
        Err(e) => {
            failures += 1;
            println!("✗ {e}");
        }
    }

    println!("\n--- POST /app/ai/suggest ---");
    match suggestion {
        Ok(s) => {
            println!("✓ category={:?} priority={:?} department={:?}", s.category_id, s.priority_id, s.department_id);
            if let Some(reason) = s.reason {
                println!("  reason: {reason}");
            }
        }
        Err(e) => {
            failures += 1;
            println!("✗ {e}");
        }
    }

    println!("\n=== Done ===");
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
