use std::future::Future;

use tokio::sync::RwLock;

// ==============================================================================
// Memo
// ==============================================================================

/// A value fetched at most once per owning instance and never evicted.
///
/// Only suitable for facts that cannot change while the owner is alive, such
/// as the chain id of the node a client is connected to. Failures are not
/// stored: the next call runs the initializer again.
///
/// No lock is held while the initializer runs, so two callers racing on an
/// empty memo may both run it and both store; the last store wins. Callers
/// that need a single in-flight fetch must coordinate themselves.
pub struct Memo<T> {
    slot: RwLock<Option<T>>,
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> Option<T> {
        self.slot.read().await.clone()
    }

    /// Return the stored value, or run `init` and store its success.
    pub async fn get_or_try_init<F, Fut, E>(&self, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.slot.read().await.clone() {
            return Ok(value);
        }

        let value = init().await?;
        *self.slot.write().await = Some(value.clone());
        Ok(value)
    }
}

impl<T: Clone> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn initializer_runs_once_on_success() {
        let memo = Memo::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = memo
                .get_or_try_init(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42u8)
                })
                .await
                .expect("init succeeds");
            assert_eq!(value, 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(memo.get().await, Some(42));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let memo: Memo<u8> = Memo::new();
        let calls = AtomicUsize::new(0);

        let first = memo
            .get_or_try_init(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u8, _>("node unreachable")
            })
            .await;
        assert_eq!(first, Err("node unreachable"));
        assert_eq!(memo.get().await, None);

        let second = memo
            .get_or_try_init(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, &str>(2)
            })
            .await;
        assert_eq!(second, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
