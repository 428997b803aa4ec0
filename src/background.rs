//! Periodic user-count logger.

use std::{sync::Arc, time::Duration};

use tokio::{
    task::{JoinError, JoinHandle},
    time::{interval, timeout, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::users::repo::UserStore;

const COUNT_TIMEOUT: Duration = Duration::from_secs(5);

/// Logs the number of stored users every `period` until `shutdown` fires.
/// Failures are logged and the loop keeps going.
pub async fn run_user_count_logger(
    store: Arc<dyn UserStore>,
    period: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick completes immediately
    ticker.tick().await;

    info!(period_secs = period.as_secs(), "starting user count logger");
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("stopping user count logger");
                return;
            }
            _ = ticker.tick() => {
                match timeout(COUNT_TIMEOUT, store.count()).await {
                    Ok(Ok(count)) => info!(count, "current number of users"),
                    Ok(Err(e)) => error!(error = %e, "counting users failed"),
                    Err(_) => error!("counting users timed out"),
                }
            }
        }
    }
}

/// Waits for a spawned logger task, logging a panic or abort instead of
/// propagating it.
pub async fn join_logger(handle: JoinHandle<()>) -> Result<(), JoinError> {
    let result = handle.await;
    if let Err(e) = &result {
        error!(error = %e, "user count logger failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory::MemoryUserStore;

    #[tokio::test]
    async fn stops_when_cancelled() {
        let store = Arc::new(MemoryUserStore::new());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_user_count_logger(
            store,
            Duration::from_millis(10),
            shutdown.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(35)).await;
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("logger should stop after cancel")
            .expect("logger task should not panic");
    }

    #[tokio::test]
    async fn keeps_running_when_store_fails() {
        let store = Arc::new(MemoryUserStore::new());
        store.fail_all();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_user_count_logger(
            store,
            Duration::from_millis(5),
            shutdown.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!handle.is_finished());
        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn join_logger_surfaces_task_panic() {
        let handle = tokio::spawn(async { panic!("counter blew up") });
        let err = join_logger(handle).await.unwrap_err();
        assert!(err.is_panic());
    }

    #[tokio::test]
    async fn join_logger_passes_clean_exit() {
        let store = Arc::new(MemoryUserStore::new());
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let handle = tokio::spawn(run_user_count_logger(
            store,
            Duration::from_millis(5),
            shutdown,
        ));
        join_logger(handle).await.unwrap();
    }
}
