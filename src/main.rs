//! tickbook demo binary.
//!
//! Loads an optional TOML config, then replays a few worked order flows
//! through a shared `MatchingEngine` and logs the resulting book.
//!
//! ```bash
//! cargo run -- --config engine.toml --log-level debug
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tickbook::types::price::{format_ticks, to_ticks};
use tickbook::{EngineConfig, MatchingEngine, Order, Side};

#[derive(Debug, Parser)]
#[command(name = "tickbook", about = "Price-time priority matching engine demo")]
struct Args {
    /// Path to a TOML engine config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "tickbook=trace"; overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    info!(
        capacity = config.order_capacity,
        tick_size = %config.tick_size,
        fill_or_kill = ?config.fill_or_kill,
        "engine configured"
    );

    let tick = config.tick_size;
    let order = |id: u64, side: Side, price: &str, qty: u64| -> Result<Order> {
        Ok(Order::new(id, side, to_ticks(price, tick)?, qty))
    };

    // Sweep the best ask level without touching worse ones
    let engine = MatchingEngine::with_config(&config);
    for o in [
        order(4, Side::Sell, "102", 15)?,
        order(5, Side::Sell, "100", 10)?,
        order(6, Side::Sell, "98", 25)?,
    ] {
        engine.submit(o)?;
    }
    let result = engine.submit(order(7, Side::Buy, "101", 15)?)?;
    info!(state = ?result.state, trades = result.trades.len(), "buy 15 @ 101");
    log_book(&engine, tick);

    // Walk bids from 110 down until the sell is exhausted
    let engine = MatchingEngine::with_config(&config);
    for o in [
        order(1, Side::Buy, "100", 10)?,
        order(2, Side::Buy, "105", 15)?,
        order(3, Side::Buy, "110", 20)?,
    ] {
        engine.submit(o)?;
    }
    let result = engine.submit(order(4, Side::Sell, "100", 30)?)?;
    for trade in &result.trades {
        info!(
            resting = trade.resting_order_id,
            price = %format_ticks(trade.price, tick),
            quantity = trade.quantity,
            "trade"
        );
    }
    log_book(&engine, tick);

    // Fill-or-kill against an empty ask side
    let fok = Order::fill_or_kill(8, Side::Buy, to_ticks("95", tick)?, 10);
    let result = engine.submit(fok)?;
    info!(state = ?result.state, killed = result.killed, "fill-or-kill buy 10 @ 95");

    // Concurrent submitters share one engine
    let engine = Arc::new(MatchingEngine::with_config(&config));
    let workers: Vec<_> = (0..4u64)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            let base = to_ticks("100", tick);
            thread::spawn(move || -> Result<usize> {
                let base = base?;
                let mut trades = 0;
                for i in 0..250u64 {
                    let id = worker * 1_000 + i + 1;
                    let side = if (worker + i) % 2 == 0 { Side::Buy } else { Side::Sell };
                    let price = base + (i % 5);
                    trades += engine.submit(Order::new(id, side, price, 1 + i % 7))?.trades.len();
                }
                Ok(trades)
            })
        })
        .collect();

    let mut trades = 0;
    for worker in workers {
        trades += worker
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread panicked"))??;
    }
    info!(
        trades,
        resting = engine.order_count(),
        state_root = %hex::encode(engine.state_root()),
        "concurrent run complete"
    );

    Ok(())
}

fn log_book(engine: &MatchingEngine, tick: Decimal) {
    for side in [Side::Sell, Side::Buy] {
        for (price, quantity) in engine.depth(side, 10) {
            info!(?side, price = %format_ticks(price, tick), quantity, "level");
        }
    }
}
