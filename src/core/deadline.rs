use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::core::error::{QuoteError, QuoteResult, Stage};

/// Runs one pipeline stage under its own budget.
///
/// When the budget elapses the stage future is dropped, which aborts whatever
/// it was waiting on (an in-flight HTTP request, a pending store write), and
/// `QuoteError::DeadlineExceeded` is returned for that stage.
///
/// # Parameters
/// - `stage`: Which step of the pipeline is running
/// - `budget`: Maximum time the stage may take
/// - `operation`: The stage itself
pub async fn with_deadline<Fut, T>(
    stage: Stage,
    budget: Duration,
    operation: Fut,
) -> QuoteResult<T>
where
    Fut: Future<Output = QuoteResult<T>>,
{
    match tokio::time::timeout(budget, operation).await {
        Ok(result) => result,
        Err(_) => {
            debug!("{} stage did not finish within {:?}", stage, budget);
            Err(QuoteError::DeadlineExceeded { stage, budget })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_fast_operation_passes_through() {
        let result = with_deadline(Stage::Fetch, Duration::from_millis(50), async {
            Ok::<_, QuoteError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_inner_error_is_kept() {
        let result: QuoteResult<()> =
            with_deadline(Stage::Store, Duration::from_millis(50), async {
                Err(QuoteError::Storage("disk full".into()))
            })
            .await;
        assert!(matches!(result, Err(QuoteError::Storage(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_operation_is_aborted() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let result = with_deadline(Stage::Fetch, Duration::from_millis(200), async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, QuoteError>(())
        })
        .await;

        match result {
            Err(QuoteError::DeadlineExceeded { stage, budget }) => {
                assert_eq!(stage, Stage::Fetch);
                assert_eq!(budget, Duration::from_millis(200));
            }
            other => panic!("Expected deadline error, got {other:?}"),
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }
}
