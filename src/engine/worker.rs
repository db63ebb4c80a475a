use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Instant;

use tokio::runtime::Runtime;

use crate::data::{SeriesProcessor, YahooProvider};

use super::messages::{FetchJob, FetchOutcome};

/// Spawns the background thread that owns the async runtime and the
/// processor. Jobs run one at a time in dispatch order; the interface
/// thread is never blocked by a slow provider.
pub fn spawn_worker_thread(rx: Receiver<FetchJob>, tx: Sender<FetchOutcome>) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("failed to create fetch runtime");
        let processor = SeriesProcessor::new(Box::new(YahooProvider::new()));

        while let Ok(job) = rx.recv() {
            process_job_sync(&rt, &processor, job, &tx);
        }
    });
}

fn process_job_sync(
    rt: &Runtime,
    processor: &SeriesProcessor,
    job: FetchJob,
    tx: &Sender<FetchOutcome>,
) {
    let start = Instant::now();
    let result = rt.block_on(processor.process(&job.ticker, &job.range));
    let duration_ms = start.elapsed().as_millis();

    match &result {
        Ok(series) => log::info!(
            "fetched {} rows for {} in {}ms",
            series.len(),
            job.ticker,
            duration_ms
        ),
        Err(e) => log::error!("fetch failed for {}: {:#}", job.ticker, e),
    }

    let _ = tx.send(FetchOutcome {
        seq: job.seq,
        symbol: job.ticker.to_string(),
        duration_ms,
        result: result.map_err(|e| format!("{:#}", e)),
    });
}
