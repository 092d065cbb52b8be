//! # Comanda Register Entry Point
//!
//! ## Usage
//! ```bash
//! comanda-register                         # platform config + database
//! comanda-register --config ./register.toml
//! comanda-register --memory                # nothing is written to disk
//! comanda-register --write-config          # write the effective config
//! ```

use std::env;
use std::path::PathBuf;

use comanda_register_lib::config::RegisterConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut in_memory = false;
    let mut write_config = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--memory" | "-m" => in_memory = true,
            "--write-config" => write_config = true,
            "--help" | "-h" => {
                println!("Comanda Register");
                println!();
                println!("Usage: comanda-register [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>   Config file (default: platform config dir)");
                println!("  -m, --memory          Use an in-memory database");
                println!("      --write-config    Write the effective config and exit");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut config = RegisterConfig::load(config_path.clone())?;
    if in_memory {
        config.storage.in_memory = true;
    }

    if write_config {
        let path = config.save(config_path)?;
        println!("✓ Config written to {}", path.display());
        return Ok(());
    }

    comanda_register_lib::init_tracing(&config);
    info!(in_memory = config.storage.in_memory, "Starting Comanda register");

    comanda_register_lib::run(config).await?;
    Ok(())
}
