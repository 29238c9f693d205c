//! Runtime abstraction layer for async operations
//!
//! Tile load chains are spawned through [`AsyncSpawner`] so that the pipeline
//! does not hard-wire a particular executor. Every spawned task comes back as
//! an [`AsyncHandle`] that can abort it, which is how a recycled tile slot
//! drops its pending load or backoff timer. Timers come from the same
//! spawner, so backoff and load deadlines run on whatever executor is installed.

use std::future::Future;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Box<dyn AsyncHandle>;

    /// A future that completes once `duration` has elapsed on this runtime's clock
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task. Calling this on a finished task does nothing.
    fn cancel(&self);
}

/// Spawn a future on the global runtime
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::trace!("runtime::spawn");
    runtime().spawn_boxed(future.boxed())
}

/// Sleep on the global runtime's clock
pub fn sleep(duration: Duration) -> BoxFuture<'static, ()> {
    runtime().sleep(duration)
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner. Spawns onto whichever tokio runtime is
        /// current, so a `current_thread` runtime gives the single-threaded
        /// cooperative model the tile pipeline is written for.
        #[derive(Debug, Default)]
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Box<dyn AsyncHandle> {
                Box::new(TokioHandle(::tokio::spawn(future)))
            }

            fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
                ::tokio::time::sleep(duration).boxed()
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Initialize the runtime with a specific spawner. Has no effect once a
/// spawner has been installed or the default has been used.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) {
    if RUNTIME.set(spawner).is_err() {
        log::debug!("runtime already initialised; keeping the existing spawner");
    }
}

/// Get the global runtime spawner
pub fn runtime() -> &'static dyn AsyncSpawner {
    RUNTIME
        .get_or_init(|| {
            #[cfg(feature = "tokio-runtime")]
            {
                Box::new(spawners::tokio_impl::TokioSpawner)
            }

            #[cfg(not(feature = "tokio-runtime"))]
            {
                panic!("No async runtime available. Enable 'tokio-runtime' or call init_runtime().");
            }
        })
        .as_ref()
}
