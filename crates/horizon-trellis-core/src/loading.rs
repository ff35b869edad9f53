//! Busy-flag guard for asynchronous operations.
//!
//! [`LoadingGuard`] wraps an async operation with a boolean busy flag. The
//! flag is raised before the operation starts and always cleared when it
//! finishes: on success, on error, and when the future is dropped before
//! completion.
//!
//! An optional delay defers raising the flag, so fast responses never
//! flicker a loading indicator. The deferred transition is a single-slot
//! cancellable task: starting the guard again while a transition is pending
//! cancels the previous one, and `stop()` cancels it outright.
//!
//! # Example
//!
//! ```no_run
//! use horizon_trellis_core::LoadingGuard;
//! use std::time::Duration;
//!
//! # async fn fetch() -> Result<Vec<u32>, String> { Ok(vec![]) }
//! # async fn demo() -> Result<(), String> {
//! let guard = LoadingGuard::with_delay(Duration::from_millis(200));
//! guard.busy_changed().connect(|&busy| {
//!     println!("spinner: {busy}");
//! });
//!
//! // busy only flips to true if fetch takes longer than 200ms
//! let rows = guard.run(fetch()).await?;
//! assert!(!guard.busy());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::property::Property;
use crate::signal::Signal;

/// Shared flag state, reachable from the deferred-transition task.
struct LoadingState {
    busy: Property<bool>,
    busy_changed: Signal<bool>,
}

impl LoadingState {
    fn set_busy(&self, busy: bool) {
        if self.busy.set(busy) {
            self.busy_changed.emit(busy);
        }
    }
}

/// Guards async operations with a (optionally delayed) busy flag.
///
/// Only one deferred transition is live at a time; the guard owns the task
/// handle and aborts it on restart, on `stop()`, and on drop, so no
/// dangling callback can mutate the flag after teardown.
pub struct LoadingGuard {
    state: Arc<LoadingState>,
    delay: Option<Duration>,
    /// The pending deferred busy-transition, if any.
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl LoadingGuard {
    /// Create a guard that raises the busy flag immediately on start.
    pub fn new() -> Self {
        Self {
            state: Arc::new(LoadingState {
                busy: Property::new(false),
                busy_changed: Signal::new(),
            }),
            delay: None,
            pending: Mutex::new(None),
        }
    }

    /// Create a guard that defers raising the busy flag by `delay`.
    ///
    /// Requires a tokio runtime when the guard is started.
    pub fn with_delay(delay: Duration) -> Self {
        let mut guard = Self::new();
        guard.delay = Some(delay);
        guard
    }

    /// Whether the guarded operation is currently marked busy.
    pub fn busy(&self) -> bool {
        self.state.busy.get()
    }

    /// Signal emitted whenever the busy flag actually changes.
    pub fn busy_changed(&self) -> &Signal<bool> {
        &self.state.busy_changed
    }

    /// Mark the start of a guarded operation.
    ///
    /// Without a delay the busy flag is raised immediately. With a delay, a
    /// deferred transition is armed; any previously pending transition is
    /// cancelled first.
    pub fn start(&self) {
        match self.delay {
            None => self.state.set_busy(true),
            Some(delay) => {
                let state = self.state.clone();
                let task = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    state.set_busy(true);
                });
                if let Some(previous) = self.pending.lock().replace(task) {
                    previous.abort();
                }
            }
        }
    }

    /// Mark the end of a guarded operation.
    ///
    /// Cancels any pending deferred transition and clears the busy flag.
    pub fn stop(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
        self.state.set_busy(false);
    }

    /// Run an async operation under the guard.
    ///
    /// The busy flag is cleared when the future resolves, with `Ok` or
    /// `Err`, and also when the returned future is dropped before
    /// completion, which is the cancellation path in cooperative
    /// scheduling.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.start();
        let _reset = StopOnDrop(self);
        fut.await
    }
}

impl Default for LoadingGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for LoadingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingGuard")
            .field("busy", &self.busy())
            .field("delay", &self.delay)
            .finish()
    }
}

/// Clears the guard when dropped: the `finally` arm of [`LoadingGuard::run`].
struct StopOnDrop<'a>(&'a LoadingGuard);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_busy_raised_and_cleared() {
        let guard = LoadingGuard::new();
        let transitions = Arc::new(Mutex::new(Vec::new()));

        let transitions_clone = transitions.clone();
        guard.busy_changed().connect(move |&busy| {
            transitions_clone.lock().push(busy);
        });

        let result: Result<u32, ()> = guard.run(async { Ok(7) }).await;

        assert_eq!(result, Ok(7));
        assert!(!guard.busy());
        assert_eq!(*transitions.lock(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_busy_cleared_on_error() {
        let guard = LoadingGuard::new();

        let result: Result<(), &str> = guard.run(async { Err("boom") }).await;

        assert_eq!(result, Err("boom"));
        assert!(!guard.busy());
    }

    #[tokio::test]
    async fn test_delay_skips_fast_operations() {
        let guard = LoadingGuard::with_delay(Duration::from_millis(100));
        let raised = Arc::new(AtomicUsize::new(0));

        let raised_clone = raised.clone();
        guard.busy_changed().connect(move |&busy| {
            if busy {
                raised_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        let result: Result<(), ()> = guard.run(async { Ok(()) }).await;
        assert_eq!(result, Ok(()));

        // Give a cancelled timer the chance to misfire before asserting.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(raised.load(Ordering::SeqCst), 0);
        assert!(!guard.busy());
    }

    #[tokio::test]
    async fn test_delay_fires_for_slow_operations() {
        let guard = LoadingGuard::with_delay(Duration::from_millis(20));
        let raised = Arc::new(AtomicUsize::new(0));

        let raised_clone = raised.clone();
        guard.busy_changed().connect(move |&busy| {
            if busy {
                raised_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        let result: Result<(), ()> = guard
            .run(async {
                tokio::time::sleep(Duration::from_millis(120)).await;
                Ok(())
            })
            .await;
        assert_eq!(result, Ok(()));

        assert_eq!(raised.load(Ordering::SeqCst), 1);
        assert!(!guard.busy());
    }

    #[tokio::test]
    async fn test_restart_cancels_previous_timer() {
        let guard = LoadingGuard::with_delay(Duration::from_millis(40));
        let raised = Arc::new(AtomicUsize::new(0));

        let raised_clone = raised.clone();
        guard.busy_changed().connect(move |&busy| {
            if busy {
                raised_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        guard.start();
        guard.start(); // cancels the first timer
        tokio::time::sleep(Duration::from_millis(120)).await;

        // Only the second timer may have fired.
        assert_eq!(raised.load(Ordering::SeqCst), 1);
        guard.stop();
        assert!(!guard.busy());
    }

    #[tokio::test]
    async fn test_cancelled_future_clears_busy() {
        let guard = Arc::new(LoadingGuard::new());

        {
            let fut = guard.run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, ()>(())
            });
            tokio::pin!(fut);
            // Poll once so the guard starts, then drop the future.
            let _ = futures_poll_once(fut.as_mut()).await;
            assert!(guard.busy());
        }

        assert!(!guard.busy());
    }

    /// Poll a future exactly once.
    async fn futures_poll_once<F: Future + Unpin>(fut: F) -> Option<F::Output> {
        use std::pin::Pin;
        use std::task::{Context, Poll};

        struct PollOnce<F>(F);
        impl<F: Future + Unpin> Future for PollOnce<F> {
            type Output = Option<F::Output>;
            fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
                match Pin::new(&mut self.0).poll(cx) {
                    Poll::Ready(out) => Poll::Ready(Some(out)),
                    Poll::Pending => Poll::Ready(None),
                }
            }
        }
        PollOnce(fut).await
    }
}
