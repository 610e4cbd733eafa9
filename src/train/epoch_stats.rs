use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean per-sample loss over this epoch, measured before each update.
    pub train_loss: f64,
    pub elapsed_ms: u64,
}
