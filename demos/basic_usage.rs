//! Basic logger usage example
//!
//! Composes a logger from the environment, logs at different levels, uses a
//! child logger and prints the local log statistics.
//!
//! Run with: cargo run --example basic_usage
//!
//! Set PETTRACK_LOG_TOKEN to also ship entries to the remote intake.

use pettrack_logger::prelude::*;
use pettrack_logger::ReqwestTransport;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== PetTrack Logger - Basic Usage Example ===\n");

    let config = LoggerConfig::from_env().with_app_version("1.0.0");
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let logger = Logger::from_config(&config, store, Arc::new(ReqwestTransport::new()?))?;

    println!("1. Logging at different levels ({}):", config.environment);
    logger.debug("Map tiles cached");
    logger.info("App launched");
    logger.warn("GPS accuracy degraded");
    logger.error("Failed to sync walk history");

    println!("\n2. Structured context and errors:");
    logger.info_with_context(
        "Pet profile opened",
        LogContext::new().with_field("pet_id", 42).with_field("name", "Biscuit"),
    );
    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upload timed out");
    logger.error_with_error("Photo upload failed", &err, None);

    println!("\n3. Child logger with bound context:");
    let walks = logger.child(LogContext::new().with_field("screen", "walks"));
    walks.info("Walk started");
    walks.info_with_context("Walk finished", LogContext::new().with_field("distance_m", 1840));

    println!("\n4. Local log statistics:");
    let stats = logger.get_log_stats();
    println!("   {} entries stored, {} awaiting delivery", stats.total_logs, stats.failed_logs);

    for failure in logger.flush_logs() {
        eprintln!("   flush failed for {}: {}", failure.provider, failure.error);
    }
    logger.cleanup();

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
