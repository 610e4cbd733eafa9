use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::check_dataset;

/// Trains `network` for `config.epochs` epochs and returns the mean training
/// loss of the **last completed epoch** (`0.0` when `epochs == 0`).
///
/// Every sample is a separate gradient step; there is no batching. The loop
/// ends early only when the `progress_tx` receiver has been dropped.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<f64> {
    check_dataset(inputs, targets)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<usize> = (0..inputs.len()).collect();
    let mut last_train_loss = 0.0;
    let mut completed = 0;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rng);
        }

        let mut total = 0.0;
        for &idx in &order {
            total += network.train(&inputs[idx], &targets[idx])?;
        }
        let train_loss = total / inputs.len() as f64;
        last_train_loss = train_loss;
        completed = epoch;

        if config.log_every > 0 && epoch % config.log_every == 0 {
            debug!("epoch {epoch}/{}: loss = {train_loss:.6}", config.epochs);
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    info!("trained {completed} epochs, final loss = {last_train_loss:.6}");
    Ok(last_train_loss)
}
