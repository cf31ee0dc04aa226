use std::fmt;
use std::sync::Arc;

/// How a session invokes its codec for each `process` call.
///
/// The codec call is the only CPU-heavy step of a stream. When a stream
/// is driven from inside an async runtime, the caller may want that step to
/// tell the runtime it is about to block, so other tasks keep running on
/// the remaining workers. The strategy is chosen once, when the session is
/// built, and never changes the order or outcome of the session's calls.
///
/// ```text
/// ┌──────────────┬────────────────────────────────────────────────────┐
/// │ Strategy     │ Behaviour                                          │
/// ├──────────────┼────────────────────────────────────────────────────┤
/// │ Inline       │ call the codec directly (default)                  │
/// │ BlockInPlace │ tokio::task::block_in_place on a multi-thread      │
/// │              │ runtime, inline everywhere else                    │
/// └──────────────┴────────────────────────────────────────────────────┘
/// ```
pub trait CallStrategy: Send + Sync {
    /// Run `op` exactly once.
    fn call(&self, op: &mut dyn FnMut());
}

/// Invoke the codec directly on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct Inline;

impl CallStrategy for Inline {
    fn call(&self, op: &mut dyn FnMut()) {
        op();
    }
}

/// Invoke the codec through [`tokio::task::block_in_place`] when running on
/// a worker of a multi-threaded tokio runtime.
///
/// `block_in_place` panics on a current-thread runtime, so the strategy
/// checks the ambient runtime flavour first and falls back to an inline
/// call outside a multi-threaded runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockInPlace;

impl BlockInPlace {
    fn on_multi_thread_runtime() -> bool {
        tokio::runtime::Handle::try_current()
            .is_ok_and(|handle| handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread)
    }
}

impl CallStrategy for BlockInPlace {
    fn call(&self, op: &mut dyn FnMut()) {
        if Self::on_multi_thread_runtime() {
            tokio::task::block_in_place(op);
        } else {
            op();
        }
    }
}

/// Shared handle to a [`CallStrategy`], as stored in option structs and
/// sessions.
#[derive(Clone)]
pub struct Strategy(Arc<dyn CallStrategy>);

impl Strategy {
    pub fn new(strategy: impl CallStrategy + 'static) -> Self {
        Self(Arc::new(strategy))
    }

    #[must_use]
    pub fn inline() -> Self {
        Self::new(Inline)
    }

    #[must_use]
    pub fn block_in_place() -> Self {
        Self::new(BlockInPlace)
    }

    pub fn call(&self, op: &mut dyn FnMut()) {
        self.0.call(op);
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::inline()
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Strategy(..)")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counting(Arc<AtomicUsize>);

    impl CallStrategy for Counting {
        fn call(&self, op: &mut dyn FnMut()) {
            self.0.fetch_add(1, Ordering::SeqCst);
            op();
        }
    }

    #[test]
    fn inline_runs_once() {
        let mut runs = 0;
        Strategy::inline().call(&mut || runs += 1);
        assert_eq!(runs, 1);
    }

    #[test]
    fn block_in_place_outside_runtime_runs_inline() {
        let mut runs = 0;
        Strategy::block_in_place().call(&mut || runs += 1);
        assert_eq!(runs, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn block_in_place_on_multi_thread_runtime() {
        let mut runs = 0;
        Strategy::block_in_place().call(&mut || runs += 1);
        assert_eq!(runs, 1);
    }

    #[tokio::test]
    async fn block_in_place_on_current_thread_runtime_does_not_panic() {
        let mut runs = 0;
        Strategy::block_in_place().call(&mut || runs += 1);
        assert_eq!(runs, 1);
    }

    #[test]
    fn custom_strategy_is_invoked() {
        let counter = Arc::new(AtomicUsize::new(0));
        let strategy = Strategy::new(Counting(Arc::clone(&counter)));
        strategy.call(&mut || {});
        strategy.call(&mut || {});
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
