//! # Example: basic_capture
//!
//! Every way a call can end, and what [`capture`] returns for it.
//!
//! ## Run
//! ```bash
//! cargo run --example basic_capture
//! ```

use std::time::Duration;

use capsule::{BoxError, Callable, Options, TargetFn, capture, exit};
use serde_json::{Value, json};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();
    let opts = Options::default().with_timeout(Duration::from_millis(100));

    let cases = vec![
        Callable::from_fn("returns", || async { Ok::<_, BoxError>(json!(5)) }),
        Callable::from_fn("errors", || async { Err::<Value, BoxError>("x".into()) }),
        Callable::from_fn("panics", || async {
            if true {
                panic!("index out of range");
            }
            Ok::<_, BoxError>(Value::Null)
        }),
        Callable::from_fn("exits", || async {
            if true {
                exit(json!({"reason": "shutdown"}));
            }
            Ok::<_, BoxError>(Value::Null)
        }),
        Callable::from_fn("hangs", || async {
            std::future::pending::<()>().await;
            Ok::<_, BoxError>(Value::Null)
        }),
        Callable::blocking("blocking", || Ok::<_, BoxError>(json!("from a thread"))),
        Callable::apply(
            TargetFn::arc("math.add", |args: Vec<Value>| async move {
                Ok::<_, BoxError>(json!(args.iter().filter_map(Value::as_i64).sum::<i64>()))
            }),
            vec![json!(2), json!(3)],
        ),
    ];

    for callable in &cases {
        match capture(callable, &opts).await {
            Ok(value) => println!("{:<10} => Ok({value})", callable.name()),
            Err(failure) => println!("{:<10} => Err({failure})", callable.name()),
        }
    }

    // ok_tuple: the value itself must say it succeeded
    let tagged = Callable::from_fn("tagged", || async { Ok::<_, BoxError>(json!(["ok", 42])) });
    let strict = opts.clone().with_ok_tuple(true);
    println!("{:<10} => {:?}", "tagged", capture(&tagged, &strict).await);

    // stacktrace: raised failures carry the call stack
    let traced = opts.with_stacktrace(true).with_skip_log(true);
    if let Err(failure) = capture(&cases[2], &traced).await {
        let trace = failure.trace().map(ToString::to_string).unwrap_or_default();
        println!("trace has {} lines", trace.lines().count());
    }
}
