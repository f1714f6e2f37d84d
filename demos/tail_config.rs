//! Example demonstrating a debounced hot-reload of one file.
//!
//! This example shows how to:
//! - Watch a file and receive its contents on every write
//! - Debounce editors that write the same file several times per save
//! - Read the latest contents from elsewhere through a `HotFile`
//!
//! Run with: cargo run --example tail_config -- path/to/file
//!
//! While running, edit the file to see reloads.

use hotfile::{FileWatcher, HotFile};
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Hot File Example ===\n");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/tail_config.txt".to_string());

    if !std::path::Path::new(&path).exists() {
        std::fs::write(&path, "greeting = \"hello\"\n")?;
        println!("Created {}", path);
    }

    let file = HotFile::spawn(
        FileWatcher::builder(&path)
            .with_min_interval(Duration::from_secs(1))
            .build(),
    );

    let reloads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reloads);
    let _handle = file.subscribe(move |data| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        println!("--- reload #{n} ({} bytes) ---", data.len());
        println!("{}", String::from_utf8_lossy(data));
    });

    println!("Watching {} (writes within 1s of a reload are ignored)", path);
    println!("Press Ctrl+C to exit\n");

    let interrupted = tokio::select! {
        _ = tokio::signal::ctrl_c() => true,
        _ = file.terminated() => false,
    };

    if interrupted {
        println!("\nShutting down...");
        file.stop().await;
    } else if let Some(e) = file.last_error() {
        println!("Watch stopped: {e}");
    }

    println!("Total reloads: {}", reloads.load(Ordering::SeqCst));
    Ok(())
}
