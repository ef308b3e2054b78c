//! Live depth-10 orderbook viewer
//!
//! Subscribes to the level2 channel for a product and prints the top ten
//! ask and bid levels every time the book changes.
//!
//! Run: cargo run --bin book_viewer -- BTC-GBP

use coinbase_book::BookView;
use coinbase_types::ProductId;
use coinbase_ws::{ConnectionEvent, Event, FeedConfig, FeedConnection, MarketEvent};
use colored::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DISPLAY_DEPTH: usize = 10;

fn print_book(view: &BookView) {
    println!(
        "{:>14}  {:>14}    {:>14}  {:>14}",
        "ASK".red().bold(),
        "SIZE".red(),
        "BID".green().bold(),
        "SIZE".green()
    );

    let rows = view.asks.len().min(DISPLAY_DEPTH).max(view.bids.len().min(DISPLAY_DEPTH));
    for i in 0..rows {
        let ask = view.asks.get(i);
        let bid = view.bids.get(i);

        let (ask_price, ask_size) = match ask {
            Some(l) => (l.price.to_string(), l.size.to_string()),
            None => (String::new(), String::new()),
        };
        let (bid_price, bid_size) = match bid {
            Some(l) => (l.price.to_string(), l.size.to_string()),
            None => (String::new(), String::new()),
        };

        println!(
            "{:>14}  {:>14}    {:>14}  {:>14}",
            ask_price.red(),
            ask_size,
            bid_price.green(),
            bid_size
        );
    }

    println!("{}", "-".repeat(64).dimmed());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let product: ProductId = std::env::args()
        .nth(1)
        .unwrap_or_else(|| ProductId::BTC_USD.to_string())
        .parse()?;

    println!("{}", "═".repeat(64).cyan());
    println!("{}  {}", "  LEVEL-2 BOOK VIEWER".cyan().bold(), product);
    println!("{}", "═".repeat(64).cyan());
    println!();

    let conn = Arc::new(FeedConnection::new(FeedConfig::new(product)));
    let mut events = conn.take_event_receiver().expect("receiver taken once");

    let feed = Arc::clone(&conn);
    let handle = tokio::spawn(async move { feed.connect_and_run().await });

    while let Some(event) = events.recv().await {
        match event {
            Event::Connection(ConnectionEvent::Connected { endpoint }) => {
                println!("{} Connected to {}\n", "✓".green(), endpoint);
            }
            Event::Market(MarketEvent::BookSnapshot { view, .. }) => {
                println!("{} Snapshot received - book bootstrapped\n", "✓".green());
                print_book(&view);
            }
            Event::Market(MarketEvent::BookUpdate { view, .. }) => {
                println!(
                    "{} {}",
                    "Update".yellow(),
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed()
                );
                print_book(&view);
            }
            Event::Connection(ConnectionEvent::Reconnecting { attempt, delay }) => {
                println!(
                    "{} Reconnecting (attempt {}) in {:?}...",
                    "!".yellow(),
                    attempt,
                    delay
                );
            }
            _ => {}
        }
    }

    handle.await??;
    Ok(())
}
