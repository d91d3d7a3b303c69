//! Fan-in of cancellation sources.

use std::future::Future;
use std::pin::Pin;

use futures_util::future::select_all;

/// Which source ended an attempt early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelSource {
    /// The per-attempt timeout timer elapsed.
    Timeout,
    /// The caller's cancellation token fired.
    Caller,
}

type SourceFuture<'a> = Pin<Box<dyn Future<Output = CancelSource> + Send + 'a>>;

/// A single cancellation signal built from several independent sources.
///
/// [`tripped`](Self::tripped) resolves with the first source to fire. With no
/// sources it never resolves. Dropping the composite drops every source,
/// including any timer, so nothing outlives the attempt that created it.
///
/// # Example
///
/// ```
/// use paycore::executor::{CancelSource, CompositeCancellation};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let signal = CompositeCancellation::new()
///     .with_source(CancelSource::Timeout, std::future::pending::<()>())
///     .with_source(CancelSource::Caller, token.cancelled());
///
/// token.cancel();
/// assert_eq!(signal.tripped().await, CancelSource::Caller);
/// # }
/// ```
#[derive(Default)]
pub struct CompositeCancellation<'a> {
    sources: Vec<SourceFuture<'a>>,
}

impl std::fmt::Debug for CompositeCancellation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeCancellation")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl<'a> CompositeCancellation<'a> {
    /// Creates a composite with no sources.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a source that trips when `fired` completes.
    #[must_use]
    pub fn with_source<F>(mut self, source: CancelSource, fired: F) -> Self
    where
        F: Future<Output = ()> + Send + 'a,
    {
        self.sources.push(Box::pin(async move {
            fired.await;
            source
        }));
        self
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true when no source is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Waits for the first source to trip and reports which one it was.
    pub async fn tripped(self) -> CancelSource {
        if self.sources.is_empty() {
            return std::future::pending().await;
        }
        let (source, _index, _rest) = select_all(self.sources).await;
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[tokio::test(start_paused = true)]
    async fn first_source_to_fire_wins() {
        let token = CancellationToken::new();
        let signal = CompositeCancellation::new()
            .with_source(
                CancelSource::Timeout,
                tokio::time::sleep(Duration::from_millis(50)),
            )
            .with_source(CancelSource::Caller, token.cancelled());

        assert_eq!(signal.tripped().await, CancelSource::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn caller_before_timer() {
        let token = CancellationToken::new();
        let signal = CompositeCancellation::new()
            .with_source(
                CancelSource::Timeout,
                tokio::time::sleep(Duration::from_millis(50)),
            )
            .with_source(CancelSource::Caller, token.cancelled());

        let (source, ()) = tokio::join!(signal.tripped(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        assert_eq!(source, CancelSource::Caller);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_composite_never_trips() {
        let signal = CompositeCancellation::new();
        assert!(signal.is_empty());

        let outcome = tokio::time::timeout(Duration::from_secs(60), signal.tripped()).await;

        assert!(outcome.is_err());
    }

    #[test]
    fn counts_sources() {
        let token = CancellationToken::new();
        let signal = CompositeCancellation::new()
            .with_source(CancelSource::Caller, token.cancelled())
            .with_source(CancelSource::Timeout, std::future::pending());

        assert_eq!(signal.len(), 2);
        assert_eq!(format!("{signal:?}"), "CompositeCancellation { sources: 2 }");
    }
}
