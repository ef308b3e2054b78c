//! Real-time spread monitor
//!
//! Polls the shared book twice a second and prints best bid, best ask,
//! and the spread on one line.
//!
//! Run: cargo run --bin spread_monitor -- ETH-USD

use coinbase_types::ProductId;
use coinbase_ws::{FeedConfig, FeedConnection};
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let product: ProductId = std::env::args()
        .nth(1)
        .unwrap_or_else(|| ProductId::BTC_USD.to_string())
        .parse()?;

    println!("{}", "═".repeat(60).cyan());
    println!("{}  {}", "  SPREAD MONITOR".cyan().bold(), product);
    println!("{}", "═".repeat(60).cyan());
    println!();

    let conn = Arc::new(FeedConnection::new(FeedConfig::new(product)));
    // Events are consumed by nobody here; the poller reads the book directly
    drop(conn.take_event_receiver());

    let feed = Arc::clone(&conn);
    tokio::spawn(async move { feed.connect_and_run().await });

    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;

        if !conn.is_book_live() {
            continue;
        }

        if let (Some(bid), Some(ask), Some(spread)) =
            (conn.best_bid(), conn.best_ask(), conn.spread())
        {
            print!("\r\x1B[K");
            print!(
                "  {} {}  {} {}  {} {}",
                "BID:".green(),
                bid.price,
                "ASK:".red(),
                ask.price,
                "SPREAD:".yellow(),
                spread
            );
            use std::io::Write;
            std::io::stdout().flush()?;
        }
    }
}
