//! Host panic hook visibility of panics raised inside a capture.
//!
//! Lives in its own binary: the panic hook is process-global and must be in
//! place before the first capture chains onto it.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};

use capsule::{BoxError, Callable, Failure, Options, capture};

static HOST_HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

fn boom() -> Callable {
    Callable::from_fn("boom", || async {
        if true {
            panic!("boom");
        }
        Ok::<_, BoxError>(serde_json::Value::Null)
    })
}

#[tokio::test]
async fn test_host_hook_sees_panic_only_when_propagated() {
    panic::set_hook(Box::new(|_| {
        HOST_HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }));

    let quiet = Options::default().with_skip_log(true);

    let err = capture(&boom(), &quiet).await.unwrap_err();
    assert!(matches!(err, Failure::Raised { .. }));
    assert_eq!(HOST_HOOK_CALLS.load(Ordering::SeqCst), 0);

    let loud = quiet.clone().with_propagate_crash(true);
    let err = capture(&boom(), &loud).await.unwrap_err();
    assert!(matches!(err, Failure::Raised { .. }));
    assert_eq!(HOST_HOOK_CALLS.load(Ordering::SeqCst), 1);

    let _ = panic::take_hook();
}
