//! Basic logger usage example
//!
//! Demonstrates console logging with fields, child loggers, a remote
//! tracker and panic recovery.
//!
//! Run with: cargo run --example basic_usage

use tee_logger::prelude::*;
use tee_logger::{global, info, warn};

fn main() -> Result<()> {
    println!("=== Tee Logger - Basic Usage Example ===\n");

    // Build a console logger; color follows terminal detection
    let logger = Logger::builder().config(&LoggerConfig::from_env()).build()?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message", &[]);
    logger.info("server starting", &[Field::int("port", 8080), Field::bool("tls", true)]);
    logger.warn("cache is cold", &[Field::duration("warmup", std::time::Duration::from_millis(250))]);
    logger.error("upstream unreachable", &[Field::string("host", "db-1")]);

    println!("\n2. Child loggers and namespaces:");
    let request = logger.with(&[Field::string("request_id", "r-7f3a")]);
    request.info("handling request", &[Field::namespace("http"), Field::string("method", "GET")]);
    info!(request, [Field::usize("rows", 12)], "query took {}ms", 3);
    warn!(request, "slow client");

    println!("\n3. Remote tracker:");
    let tracker = InMemoryTracker::new();
    let remote = RemoteTrackerSink::new(
        TrackerConfig::default().with_tag("service", "demo"),
        tracker.clone(),
    )?;
    let logger = logger.attach_remote(remote)?;
    logger.warn("stays on the console", &[]);
    logger.error("also sent to the tracker", &[Field::int("code", 503)]);
    println!("   tracker received {} event(s)", tracker.len());

    println!("\n4. Panic recovery:");
    let result: Option<u32> = logger.recover(false, || {
        let items: Vec<u32> = Vec::new();
        items[1]
    });
    println!("   recovered: {:?}, tracker now has {} event(s)", result, tracker.len());

    println!("\n5. Process-wide logger:");
    global::info("hello from the global logger", &[]);

    println!("\n6. Sink metrics:");
    let metrics = logger.metrics();
    println!(
        "   written: {}, failed: {}, failure rate: {:.1}%",
        metrics.records_written(),
        metrics.write_failures(),
        metrics.failure_rate()
    );

    logger.sync()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
