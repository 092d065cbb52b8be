//! # Sample Menu Seeder
//!
//! Fills the local catalog with a small bar-and-kitchen menu for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p comanda-store --bin seed
//!
//! # Specify database path
//! cargo run -p comanda-store --bin seed -- --db ./data/comanda.db
//!
//! # Replace an existing menu
//! cargo run -p comanda-store --bin seed -- --force
//! ```
//!
//! Records are written in the spellings real exports use (Spanish camelCase,
//! snake_case columns, English names) so the normalization path gets
//! exercised end to end.

use comanda_core::catalog::{lookup, Field};
use comanda_core::pricing::{format_price, format_price_text, NO_PRICE};
use comanda_core::PriceType;
use comanda_store::{Database, ProductSource, StoreConfig};
use serde_json::{json, Value};
use std::env;

/// A raw price cell as text, the way a menu sheet shows it.
fn price_cell(record: &Value, field: Field) -> String {
    match lookup(record, field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn sample_menu() -> Vec<(&'static str, Vec<Value>)> {
    vec![
        (
            "vodka",
            vec![
                json!({"nombre": "ABSOLUT AZUL", "precioBotella": 850, "precioLitro": 480, "precioCopa": 95}),
                json!({"nombre": "SMIRNOFF TAMARINDO", "precioBotella": 720, "precioCopa": 85}),
                json!({"name": "Grey Goose", "bottle_price": "$1,450.00", "glassPrice": 160}),
            ],
        ),
        (
            "ron",
            vec![
                json!({"nombre": "BACARDI MANGO", "precioBotella": 780, "precioCopa": 90}),
                json!({"nombre": "BACARDI BLANCO", "precioBotella": 700, "precioLitro": 380, "precioCopa": 80}),
                json!({
                    "nombre": "CAPITAN MORGAN",
                    "precio_botella": 820,
                    "mixers_botella": ["Coca", "Coca Light", "Mineral"],
                }),
            ],
        ),
        (
            "tequila",
            vec![
                json!({"nombre": "DON JULIO 70", "precioBotella": 1650, "precioCopa": 180}),
                json!({"nombre": "CENTENARIO REPOSADO 700 ML", "precioBotella": 950, "precioCopa": 110}),
            ],
        ),
        (
            "ginebra",
            vec![json!({
                "nombre": "TANQUERAY",
                "precioBotella": 1200,
                "precioCopa": 120,
                "mixersCopa": "[\"Tónica\", \"Sprite\", \"Mineral\"]",
            })],
        ),
        (
            "digestivos",
            vec![
                json!({"nombre": "JAGERMEISTER", "precioBotella": 990, "precioCopa": 110}),
                json!({"nombre": "BAILEYS", "precioBotella": 880, "precioCopa": 95}),
                json!({"nombre": "LICOR 43", "precioBotella": 950, "precioCopa": 100}),
            ],
        ),
        (
            "espumosos",
            vec![json!({"nombre": "MOET CHANDON", "precioBotella": 2400})],
        ),
        (
            "cervezas",
            vec![
                json!({"nombre": "CORONA", "precio": 55}),
                json!({"nombre": "MODELO ESPECIAL", "precio": 60}),
                json!({"name": "Michelob Ultra", "price": "$65.50"}),
            ],
        ),
        (
            "pizzas",
            vec![
                json!({"nombre": "PIZZA HAWAIANA", "precio": 180}),
                json!({"nombre": "PIZZA PEPPERONI", "precio": 175}),
            ],
        ),
        (
            "alitas",
            vec![json!({"nombre": "ALITAS BBQ", "precio": 150})],
        ),
        (
            "carnes",
            vec![
                json!({"nombre": "RIB EYE", "precio": 420}),
                json!({"nombre": "ARRACHERA", "precio_venta": 320}),
            ],
        ),
        (
            "platos fuertes",
            vec![json!({"nombre": "MOLCAJETE MIXTO", "precio": 380})],
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./comanda_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Comanda Sample Menu Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./comanda_dev.db)");
                println!("  -f, --force        Replace an existing menu");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Comanda Sample Menu Seeder");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(StoreConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let catalog = db.catalog();
    let existing = catalog.count().await?;
    if existing > 0 && !force {
        println!("⚠ Catalog already has {} records", existing);
        println!("  Skipping seed. Pass --force to replace it.");
        return Ok(());
    }

    println!();
    println!("Writing menu sections...");

    let mut written = 0;
    for (category, records) in sample_menu() {
        let count = catalog.replace_category(category, &records).await?;
        println!("  {:<16} {} records", category, count);
        written += count;
    }

    println!();
    println!("✓ Wrote {} records", written);

    println!();
    println!("Verifying normalization...");
    let vodka = catalog.get_products_by_category("vodka").await?;
    let offers: usize = vodka.iter().map(|entry| entry.offers().len()).sum();
    println!("  vodka: {} records, {} priced offers", vodka.len(), offers);

    let raw_vodka = sample_menu()
        .into_iter()
        .find(|(category, _)| *category == "vodka")
        .map(|(_, records)| records)
        .unwrap_or_default();
    for (record, entry) in raw_vodka.iter().zip(&vodka) {
        let parsed = entry
            .price_for(PriceType::Bottle)
            .map(format_price)
            .unwrap_or_else(|| NO_PRICE.to_string());
        println!(
            "  {:<20} botella {:>10} -> {}",
            entry.name,
            format_price_text(&price_cell(record, Field::BottlePrice)),
            parsed
        );
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
