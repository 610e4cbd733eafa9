use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Serializable state of a [`Network`].
///
/// Weights and biases are flattened row-major, one entry per layer
/// transition. The output cache is not part of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub layer_sizes: Vec<usize>,
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<Vec<f64>>,
    pub learning_rate: f64,
}

impl NetworkSnapshot {
    /// JSON has no encoding for NaN or infinities, so such a snapshot could
    /// be written but never read back.
    pub fn check_finite(&self) -> Result<()> {
        if !self.learning_rate.is_finite() {
            return Err(NnError::CorruptModel(format!(
                "learning rate {} is not finite",
                self.learning_rate
            )));
        }
        for (what, arrays) in [("weights", &self.weights), ("biases", &self.biases)] {
            for (i, values) in arrays.iter().enumerate() {
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(NnError::CorruptModel(format!(
                        "{what}[{i}] holds a non-finite value"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Network {
    pub fn to_snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            layer_sizes: self.layer_sizes().to_vec(),
            weights: self.weights().iter().map(Matrix::to_flat).collect(),
            biases: self.biases().iter().map(Matrix::to_flat).collect(),
            learning_rate: self.learning_rate(),
        }
    }

    /// Rebuilds a network, rejecting snapshots whose arrays disagree with
    /// their layer sizes.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Network> {
        let NetworkSnapshot { layer_sizes, weights, biases, learning_rate } = snapshot;

        if layer_sizes.len() < 2 {
            return Err(NnError::CorruptModel(format!(
                "snapshot lists {} layers",
                layer_sizes.len()
            )));
        }
        let transitions = layer_sizes.len() - 1;
        if weights.len() != transitions || biases.len() != transitions {
            return Err(NnError::CorruptModel(format!(
                "expected {transitions} weight and bias arrays, found {} and {}",
                weights.len(),
                biases.len()
            )));
        }

        let mut weight_mats = Vec::with_capacity(transitions);
        let mut bias_mats = Vec::with_capacity(transitions);
        for (i, pair) in layer_sizes.windows(2).enumerate() {
            weight_mats.push(
                Matrix::from_flat(pair[0], pair[1], &weights[i])
                    .map_err(|_| wrong_length("weights", i))?,
            );
            bias_mats.push(
                Matrix::from_flat(pair[1], 1, &biases[i]).map_err(|_| wrong_length("biases", i))?,
            );
        }

        Network::from_parts(layer_sizes, weight_mats, bias_mats, learning_rate).map_err(|e| match e {
            NnError::InvalidTopology(msg) => NnError::CorruptModel(msg),
            other => other,
        })
    }

    /// Writes the network as JSON to any byte sink.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot = self.to_snapshot();
        snapshot.check_finite()?;
        serde_json::to_writer(writer, &snapshot)?;
        Ok(())
    }

    /// Reads a network previously written by `write_json` or `save_json`.
    pub fn read_json<R: Read>(reader: R) -> Result<Network> {
        let snapshot: NetworkSnapshot = serde_json::from_reader(reader)?;
        Network::from_snapshot(snapshot).map_err(|e| {
            warn!("rejected stored network: {e}");
            e
        })
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.to_snapshot();
        snapshot.check_finite()?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;
        info!("saved network {:?} to {}", self.layer_sizes(), path.display());
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let network = Network::read_json(BufReader::new(File::open(path)?))?;
        info!("loaded network {:?} from {}", network.layer_sizes(), path.display());
        Ok(network)
    }
}

fn wrong_length(what: &str, index: usize) -> NnError {
    NnError::CorruptModel(format!("{what}[{index}] has the wrong length"))
}
