//! # Development Cart Seeder
//!
//! Fills the configured store with a cart built from the embedded catalog,
//! then prints the cart and its totals.
//!
//! ## Usage
//! ```bash
//! # Seed 3 lines (default) into the configured store
//! cargo run -p storefront-db --bin seed
//!
//! # Seed more lines, two units each
//! cargo run -p storefront-db --bin seed -- --lines 6 --quantity 2
//!
//! # Specify database path and cart key
//! cargo run -p storefront-db --bin seed -- --db ./storefront_dev.db --key cart:dev
//!
//! # Empty the stored cart instead
//! cargo run -p storefront-db --bin seed -- --clear
//! ```
//!
//! Only in-stock products are used, in catalog order, each with its default
//! color and size.

use std::env;
use std::path::PathBuf;

use storefront_core::{AddOptions, Catalog, MAX_ITEM_QUANTITY};
use storefront_db::{CartSession, Database, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LINES: usize = 3;
const DEFAULT_QUANTITY: i64 = 1;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = StoreConfig::from_env();
    let mut lines = DEFAULT_LINES;
    let mut quantity = DEFAULT_QUANTITY;
    let mut clear = false;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--lines" | "-l" => {
                if i + 1 < args.len() {
                    lines = args[i + 1].parse().unwrap_or(DEFAULT_LINES);
                    i += 1;
                }
            }
            "--quantity" | "-q" => {
                if i + 1 < args.len() {
                    quantity = args[i + 1].parse().unwrap_or(DEFAULT_QUANTITY);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--key" | "-k" => {
                if i + 1 < args.len() {
                    config.cart_key = args[i + 1].clone();
                    i += 1;
                }
            }
            "--clear" => clear = true,
            "--help" | "-h" => {
                println!("Storefront Cart Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -l, --lines <N>     Number of cart lines (default: 3)");
                println!("  -q, --quantity <N>  Units per line, 1-10 (default: 1)");
                println!("  -d, --db <PATH>     Database file path (default: platform data dir)");
                println!("  -k, --key <KEY>     Cart storage key (default: cart)");
                println!("      --clear         Empty the stored cart and exit");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    println!("🌱 Storefront Cart Seeder");
    println!("=========================");
    println!("Database: {}", config.database_path.display());
    println!("Cart key: {}", config.cart_key);
    println!();

    config.ensure_data_dir()?;
    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");

    let mut session = CartSession::open(db.carts(&config.cart_key)).await?;

    if clear {
        session.clear_cart().await?;
        session.close().await?;
        println!("✓ Cart cleared");
        db.close().await;
        return Ok(());
    }

    if !session.cart().is_empty() {
        println!(
            "⚠ Cart already holds {} line(s); adding on top",
            session.cart().line_count()
        );
    }

    let catalog = Catalog::builtin()?;
    let quantity = quantity.clamp(1, MAX_ITEM_QUANTITY);

    for product in catalog.in_stock().take(lines) {
        for _ in 0..quantity {
            session.add_to_cart(product, AddOptions::default()).await?;
        }
        info!(product_id = %product.id, quantity, "Seeded cart line");
    }

    println!();
    for item in session.cart().items() {
        println!(
            "  {:>2} × {:<28} {:<14} {:>9}",
            item.quantity,
            item.product.name,
            variant_label(item.selected_color.as_deref(), item.selected_size.as_deref()),
            item.subtotal().to_string()
        );
    }

    let totals = session.totals();
    println!();
    println!("  Items:    {}", totals.total_items);
    println!("  Subtotal: {}", totals.raw_total);
    if !totals.discount.is_zero() {
        println!("  Discount: -{}", totals.discount);
    }
    println!("  Total:    {}", totals.total_price);

    session.close().await?;
    db.close().await;

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

fn variant_label(color: Option<&str>, size: Option<&str>) -> String {
    match (color, size) {
        (Some(c), Some(s)) => format!("{}/{}", c, s),
        (Some(c), None) => c.to_string(),
        (None, Some(s)) => s.to_string(),
        (None, None) => "-".to_string(),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_db=trace` - Trace the storage crate only
/// - Default: `info,storefront=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
