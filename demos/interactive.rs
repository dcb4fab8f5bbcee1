//! Interactive Troubleshooting Console
//!
//! Runs one diagnosis session on the terminal, passing the opaque session
//! token back and forth exactly as an HTTP transport would.
//!
//! Run with: cargo run --example interactive -- <catalog.json> [machine_id]
//! Set RUST_LOG=faultfinder=debug to watch the engine's transitions.

use faultfinder::{DiagnosisService, EngineConfig};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let config = EngineConfig {
        catalog_path: args
            .next()
            .unwrap_or_else(|| "base_conocimiento.json".to_string())
            .into(),
        ..EngineConfig::default()
    };
    let service = DiagnosisService::from_config(&config)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let machine_id = match args.next() {
        Some(id) => id,
        None => {
            println!("=== Machines ===");
            for (id, name) in service.machines() {
                println!("  {id:<20} {name}");
            }
            prompt("Machine id")?;
            lines.next().transpose()?.unwrap_or_default()
        }
    };

    prompt("Describe the problem")?;
    let description = lines.next().transpose()?.unwrap_or_default();

    let mut response = service.start_session(machine_id.trim(), &description)?;
    println!("\n{}", response.result);

    while !response.result.is_final() {
        prompt("si/no")?;
        let Some(line) = lines.next().transpose()? else {
            println!("\nSession abandoned.");
            return Ok(());
        };
        match service.continue_session(&response.state, &line) {
            Ok(next) => {
                response = next;
                println!("\n{}", response.result);
            }
            Err(err) => println!("  {err}"),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> io::Result<()> {
    print!("{label}> ");
    io::stdout().flush()
}
