use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use newswire_core::IngestionJob;
use newswire_core::traits::{ApiKeySource, Clock, NewsClient, Store};

/// Run `job` every `period` until `cancel_token` fires.
///
/// The first run starts immediately. A failed run is logged and the next
/// tick proceeds as usual. Cancellation interrupts an in-flight run.
pub fn spawn_ingestion<C, S, K, T>(
    job: IngestionJob<C, S, K, T>,
    period: Duration,
    cancel_token: CancellationToken,
) -> JoinHandle<()>
where
    C: NewsClient + 'static,
    S: Store + 'static,
    K: ApiKeySource + 'static,
    T: Clock + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(period_secs = period.as_secs(), "Ingestion scheduler started");

        loop {
            tokio::select! {
                () = cancel_token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                () = cancel_token.cancelled() => break,
                result = job.ingest() => match result {
                    Ok(log) => tracing::info!(
                        run_id = %log.run_id,
                        queried = log.queried.len(),
                        elapsed_ms = log.elapsed_time.as_millis() as u64,
                        "Scheduled ingestion finished"
                    ),
                    Err(e) => tracing::error!(error = %e, "Scheduled ingestion failed"),
                },
            }
        }

        tracing::info!("Ingestion scheduler stopped");
    })
}
