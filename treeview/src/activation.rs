//! Launching leaf callbacks.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use log::{debug, warn};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::LOG_TARGET;
use crate::node::{Callback, CallbackResult};
use crate::spinner::BusyHandle;

/// What activating a node did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A branch flipped its expansion flag.
    Toggled { id: String, expanded: bool },
    /// A leaf's callback was started in the background.
    Launched { id: String },
    /// A leaf without a callback; only the selection moved.
    Selected { id: String },
}

impl Activation {
    pub fn id(&self) -> &str {
        match self {
            Activation::Toggled { id, .. }
            | Activation::Launched { id }
            | Activation::Selected { id } => id,
        }
    }
}

/// A callback panicked instead of returning.
#[derive(Debug, Error)]
#[error("callback panicked: {message}")]
pub struct CallbackPanicked {
    pub message: String,
}

/// Mark `id` busy and run its callback on `runtime`.
///
/// The node is busy before this returns. The spawned task clears it when the
/// callback completes, whether it succeeded, failed or panicked. Failures are
/// logged and go no further.
pub fn launch(
    runtime: &Handle,
    id: String,
    callback: Callback,
    busy: BusyHandle,
    debug_logging: bool,
) -> JoinHandle<()> {
    busy.begin(&id);
    if debug_logging {
        debug!(target: LOG_TARGET, "spinner started for '{id}'");
    }

    runtime.spawn(async move {
        match run_callback(callback).await {
            Ok(()) if debug_logging => {
                debug!(target: LOG_TARGET, "callback for '{id}' finished");
            }
            Ok(()) => {}
            Err(err) => warn!(target: LOG_TARGET, "callback for '{id}' failed: {err}"),
        }
        busy.finish(&id);
    })
}

async fn run_callback(callback: Callback) -> CallbackResult {
    match callback {
        Callback::Async(f) => {
            let result = AssertUnwindSafe(async move { f().await })
                .catch_unwind()
                .await;
            result.unwrap_or_else(|panic| Err(panicked(panic.as_ref())))
        }
        Callback::Blocking(f) => match tokio::task::spawn_blocking(move || f()).await {
            Ok(result) => result,
            Err(join) if join.is_panic() => Err(panicked(join.into_panic().as_ref())),
            Err(join) => Err(join.into()),
        },
    }
}

fn panicked(payload: &(dyn Any + Send)) -> crate::BoxError {
    Box::new(CallbackPanicked {
        message: extract_panic_message(payload),
    })
}

/// Pull a readable message out of a panic payload.
pub fn extract_panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn async_callback<F>(f: F) -> Callback
    where
        F: Fn() -> CallbackResult + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Callback::Async(Arc::new(move || {
            let f = f.clone();
            async move { f() }.boxed()
        }))
    }

    #[tokio::test]
    async fn test_failure_still_clears_busy() {
        let busy = crate::spinner::SpinnerScheduler::start(
            &Handle::current(),
            0,
            std::time::Duration::from_millis(200),
            false,
        );
        let handle = launch(
            &Handle::current(),
            "leaf".into(),
            async_callback(|| Err("boom".into())),
            busy.busy().clone(),
            false,
        );
        assert!(busy.busy().with_snapshot(|s| s.is_busy("leaf")));
        handle.await.unwrap();
        assert!(!busy.busy().with_snapshot(|s| s.is_busy("leaf")));
    }

    #[tokio::test]
    async fn test_panicking_callbacks_are_contained() {
        let scheduler = crate::spinner::SpinnerScheduler::start(
            &Handle::current(),
            0,
            std::time::Duration::from_millis(200),
            false,
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let blocking = Callback::Blocking(Arc::new(move || -> CallbackResult {
            counted.fetch_add(1, Ordering::SeqCst);
            panic!("blocking boom")
        }));
        let handle = launch(&Handle::current(), "b".into(), blocking, scheduler.busy().clone(), false);
        handle.await.unwrap();

        let handle = launch(
            &Handle::current(),
            "a".into(),
            async_callback(|| panic!("async boom")),
            scheduler.busy().clone(),
            false,
        );
        handle.await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(scheduler.busy().with_snapshot(|s| s.is_empty()));
    }

    #[test]
    fn test_extract_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(extract_panic_message(payload.as_ref()), "static str");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(extract_panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(extract_panic_message(payload.as_ref()), "Unknown panic");
    }
}
