use std::sync::mpsc::{Receiver, Sender, channel};

use crate::domain::{DateRange, Ticker};

use super::messages::{FetchJob, FetchOutcome};
use super::worker;

/// The interface side of the fetch machinery: jobs go out through a channel,
/// tagged outcomes come back, and the single-threaded UI loop drains them
/// with `poll` each frame. Overlapping requests are not cancelled; the
/// outcome of any superseded request is discarded (last dispatch wins).
pub struct ChartEngine {
    job_tx: Sender<FetchJob>,
    result_rx: Receiver<FetchOutcome>,

    next_seq: u64,
    latest_seq: Option<u64>,
    in_flight: usize,
}

impl ChartEngine {
    /// Initialize the engine and spawn the worker thread.
    pub fn new() -> Self {
        let (job_tx, job_rx) = channel::<FetchJob>();
        let (result_tx, result_rx) = channel::<FetchOutcome>();

        worker::spawn_worker_thread(job_rx, result_tx);

        Self {
            job_tx,
            result_rx,
            next_seq: 0,
            latest_seq: None,
            in_flight: 0,
        }
    }

    /// Send one job to the worker. Returns the job's sequence number.
    pub fn dispatch(&mut self, ticker: Ticker, range: DateRange) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = Some(seq);
        self.in_flight += 1;

        log::info!("dispatching fetch #{} for {} over {}", seq, ticker, range);
        let _ = self.job_tx.send(FetchJob { seq, ticker, range });
        seq
    }

    /// Drain finished jobs without blocking. Only an outcome for the most
    /// recently dispatched request is surfaced.
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        let mut latest_outcome = None;

        while let Ok(outcome) = self.result_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);

            if Some(outcome.seq) == self.latest_seq {
                latest_outcome = Some(outcome);
            } else {
                log::debug!("dropping superseded fetch outcome #{}", outcome.seq);
            }
        }

        latest_outcome
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

impl Default for ChartEngine {
    fn default() -> Self {
        Self::new()
    }
}
