//! # Example: retry_with_backoff
//!
//! Demonstrates how [`capture`] retries a failing callable with a fixed
//! backoff until it succeeds or the attempt budget runs out.
//!
//! The callable fails twice before succeeding.
//!
//! ## Flow
//! ```text
//! capture()
//!   ├─► attempt 1 → Err("boom #1")
//!   ├─► sleep(backoff)
//!   ├─► attempt 2 → Err("boom #2")
//!   ├─► sleep(backoff)
//!   └─► attempt 3 → Ok({"attempt": 3})
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example retry_with_backoff
//! ```

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use capsule::{BoxError, Callable, Options, capture};
use serde_json::json;
use tracing_subscriber::EnvFilter;

static FAIL_COUNT: AtomicU64 = AtomicU64::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Define a callable that fails 2 times before succeeding
    let flaky = Callable::from_fn("flaky", || async {
        let attempt = FAIL_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[flaky] attempt {attempt}");

        if attempt <= 2 {
            println!("[flaky] simulated failure #{attempt}");
            Err::<_, BoxError>(format!("boom #{attempt}").into())
        } else {
            println!("[flaky] success on attempt {attempt}");
            Ok(json!({ "attempt": attempt }))
        }
    });

    // 2. Three attempts, 200ms apart
    let opts = Options::default()
        .with_retry_count(3)
        .with_backoff(Duration::from_millis(200));

    // 3. Run
    let value = capture(&flaky, &opts).await?;
    println!("[demo] result: {value}");

    // 4. Same callable with a budget of one: the failure is logged and returned
    FAIL_COUNT.store(0, Ordering::Relaxed);
    let err = capture(&flaky, &Options::default()).await.unwrap_err();
    println!("[demo] single attempt: {} ({})", err, err.as_label());
    Ok(())
}
