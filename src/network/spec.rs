use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::network::Network;

fn default_learning_rate() -> f64 {
    1.0
}

/// A serializable description of a network before it has any weights.
///
/// Fields:
/// - `layer_sizes`   — node count per layer, input first, output last
/// - `learning_rate` — step size applied by `Network::train` (defaults to 1.0)
/// - `seed`          — fixes weight initialization when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub layer_sizes: Vec<usize>,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkSpec {
    pub fn new(layer_sizes: Vec<usize>) -> Self {
        NetworkSpec {
            layer_sizes,
            learning_rate: default_learning_rate(),
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Allocates and randomly initializes the described network.
    pub fn build(&self) -> Result<Network> {
        let mut network = match self.seed {
            Some(seed) => Network::seeded(&self.layer_sizes, seed)?,
            None => Network::new(&self.layer_sizes)?,
        };
        network.set_learning_rate(self.learning_rate);
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NnError;

    #[test]
    fn missing_fields_take_defaults() {
        let spec: NetworkSpec = serde_json::from_str(r#"{"layer_sizes":[2,4,1]}"#).unwrap();
        assert_eq!(spec, NetworkSpec::new(vec![2, 4, 1]));
    }

    #[test]
    fn build_applies_seed_and_learning_rate() {
        let spec = NetworkSpec::new(vec![2, 3, 1]).with_seed(5).with_learning_rate(0.3);
        let a = spec.build().unwrap();
        let b = spec.build().unwrap();
        assert_eq!(a.learning_rate(), 0.3);
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn build_rejects_single_layer() {
        let err = NetworkSpec::new(vec![4]).build().unwrap_err();
        assert!(matches!(err, NnError::InvalidTopology(_)));
    }
}
