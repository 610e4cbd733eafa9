use std::sync::mpsc;

use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`      — total number of full passes over the training data
/// - `shuffle`     — visit samples in a fresh random order each epoch
/// - `seed`        — seeds the shuffling generator; `None` draws from entropy
/// - `log_every`   — emit a `debug!` line every N epochs; `0` disables it
/// - `progress_tx` — optional channel sender; one `EpochStats` is sent per
///                   completed epoch. If the receiver is dropped the loop
///                   returns after the current epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub log_every: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// In-order training with no progress channel and no periodic logging.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            shuffle: false,
            seed: None,
            log_every: 0,
            progress_tx: None,
        }
    }

    pub fn shuffled(mut self, seed: Option<u64>) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    pub fn log_every(mut self, epochs: usize) -> Self {
        self.log_every = epochs;
        self
    }

    pub fn progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }
}
