use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::activation::{sigmoid, sigmoid_derivative};
use crate::error::{NnError, Result};
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;

/// Fully connected sigmoid network trained one sample at a time.
///
/// `weights[i]` is `layer_sizes[i] x layer_sizes[i + 1]` and `biases[i]` is
/// `layer_sizes[i + 1] x 1`. `outputs` caches every layer's activations
/// from the most recent forward pass and is empty until the first one.
#[derive(Debug, Clone)]
pub struct Network {
    layer_sizes: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
    outputs: Vec<Matrix>,
    learning_rate: f64,
}

impl Network {
    /// Builds a network with weights drawn from an entropy-seeded generator.
    pub fn new(layer_sizes: &[usize]) -> Result<Network> {
        Network::with_rng(layer_sizes, &mut StdRng::from_entropy())
    }

    /// Deterministic construction: the same seed gives the same weights.
    pub fn seeded(layer_sizes: &[usize], seed: u64) -> Result<Network> {
        Network::with_rng(layer_sizes, &mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Network> {
        validate_topology(layer_sizes)?;

        let (weights, biases): (Vec<Matrix>, Vec<Matrix>) = layer_sizes
            .windows(2)
            .map(|pair| {
                let w = Matrix::random_uniform(pair[0], pair[1], &mut *rng);
                let b = Matrix::random_uniform(pair[1], 1, &mut *rng);
                (w, b)
            })
            .unzip();

        debug!("built network with layer sizes {:?}", layer_sizes);

        Ok(Network {
            layer_sizes: layer_sizes.to_vec(),
            weights,
            biases,
            outputs: Vec::new(),
            learning_rate: 1.0,
        })
    }

    /// Assembles a network from existing parameters, checking every shape.
    pub(crate) fn from_parts(
        layer_sizes: Vec<usize>,
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
        learning_rate: f64,
    ) -> Result<Network> {
        validate_topology(&layer_sizes)?;

        let expected = layer_sizes.len() - 1;
        if weights.len() != expected || biases.len() != expected {
            return Err(NnError::CorruptModel(format!(
                "expected {expected} weight and bias matrices, found {} and {}",
                weights.len(),
                biases.len()
            )));
        }

        for (i, pair) in layer_sizes.windows(2).enumerate() {
            if weights[i].shape() != (pair[0], pair[1]) {
                return Err(NnError::CorruptModel(format!(
                    "weights[{i}] is {:?}, expected {:?}",
                    weights[i].shape(),
                    (pair[0], pair[1])
                )));
            }
            if biases[i].shape() != (pair[1], 1) {
                return Err(NnError::CorruptModel(format!(
                    "biases[{i}] is {:?}, expected {:?}",
                    biases[i].shape(),
                    (pair[1], 1)
                )));
            }
        }

        Ok(Network { layer_sizes, weights, biases, outputs: Vec::new(), learning_rate })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    /// Activations of every layer from the last forward pass.
    pub fn outputs(&self) -> &[Matrix] {
        &self.outputs
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Takes effect on the next `train` call. Any value is accepted.
    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Forward pass; refreshes the output cache and returns the last layer.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        check_len("input", self.input_size(), input.len())?;

        let mut outputs = Vec::with_capacity(self.layer_sizes.len());
        outputs.push(Matrix::from_column(input));

        for i in 1..self.layer_sizes.len() {
            // (o^T · W)^T == W^T · o, kept as a column vector.
            let mut z = Matrix::matmul(&outputs[i - 1].transpose(), &self.weights[i - 1])?;
            z.transpose_in_place();
            z.add_in_place(&self.biases[i - 1])?;
            z.map_in_place(|x, _, _| sigmoid(x));
            outputs.push(z);
        }

        self.outputs = outputs;
        self.outputs[self.outputs.len() - 1].to_column()
    }

    /// One step of gradient descent on a single sample.
    ///
    /// Returns the mean squared error of the forward pass that preceded the
    /// update. The error sent back to layer `i - 1` is computed with the
    /// weights already updated for layer `i`.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<f64> {
        check_len("output", self.output_size(), target.len())?;

        let prediction = self.predict(input)?;
        let loss = MseLoss::loss(&prediction, target);

        let last = self.layer_sizes.len() - 1;
        let targets = Matrix::from_column(target);
        let mut errors = Matrix::subtract(&targets, &self.outputs[last])?;

        for i in (1..=last).rev() {
            let mut gradient = self.outputs[i].map(sigmoid_derivative);
            gradient.hadamard_in_place(&errors)?;
            gradient.scale(self.learning_rate);

            self.biases[i - 1].add_in_place(&gradient)?;

            let delta_weights = Matrix::matmul(&self.outputs[i - 1], &gradient.transpose())?;
            self.weights[i - 1].add_in_place(&delta_weights)?;

            if i > 1 {
                errors = Matrix::matmul(&self.weights[i - 1], &errors)?;
            }
        }

        Ok(loss)
    }
}

fn validate_topology(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(NnError::InvalidTopology(format!(
            "need at least 2 layers, got {}",
            layer_sizes.len()
        )));
    }
    if let Some(pos) = layer_sizes.iter().position(|&n| n == 0) {
        return Err(NnError::InvalidTopology(format!("layer {pos} has zero nodes")));
    }
    Ok(())
}

fn check_len(layer: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(NnError::DimensionMismatch { layer, expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn construction_shapes() {
        let net = Network::seeded(&[3, 5, 2], 0).unwrap();
        assert_eq!(net.weights()[0].shape(), (3, 5));
        assert_eq!(net.weights()[1].shape(), (5, 2));
        assert_eq!(net.biases()[0].shape(), (5, 1));
        assert_eq!(net.biases()[1].shape(), (2, 1));
        assert!(net.outputs().is_empty());
        assert_eq!(net.learning_rate(), 1.0);
    }

    #[test]
    fn parameters_start_in_unit_range() {
        let net = Network::seeded(&[4, 6, 3], 9).unwrap();
        for m in net.weights().iter().chain(net.biases()) {
            assert!(m.to_flat().iter().all(|&x| (-1.0..1.0).contains(&x)));
        }
    }

    #[test]
    fn rejects_bad_topologies() {
        assert!(matches!(Network::seeded(&[3], 0), Err(NnError::InvalidTopology(_))));
        assert!(matches!(Network::seeded(&[], 0), Err(NnError::InvalidTopology(_))));
        assert!(matches!(Network::seeded(&[2, 0, 1], 0), Err(NnError::InvalidTopology(_))));
    }

    #[test]
    fn same_seed_same_weights() {
        let a = Network::seeded(&[2, 3, 1], 11).unwrap();
        let b = Network::seeded(&[2, 3, 1], 11).unwrap();
        assert_eq!(a.weights(), b.weights());
        assert_eq!(a.biases(), b.biases());
    }

    #[test]
    fn predict_returns_one_value_in_open_unit_interval() {
        let mut net = Network::seeded(&[2, 2, 1], 5).unwrap();
        for input in [[0.0, 0.0], [1.0, -1.0], [3.5, 2.0]] {
            let out = net.predict(&input).unwrap();
            assert_eq!(out.len(), 1);
            assert!(out[0] > 0.0 && out[0] < 1.0);
        }
        assert_eq!(net.outputs().len(), 3);
        assert_eq!(net.outputs()[1].shape(), (2, 1));
    }

    #[test]
    fn predict_matches_direct_formula() {
        let mut net = Network::seeded(&[3, 2], 21).unwrap();
        let input = [0.2, -0.7, 1.1];
        let out = net.predict(&input).unwrap();

        let w = &net.weights()[0];
        let b = &net.biases()[0];
        for (j, value) in out.iter().enumerate() {
            let z: f64 = (0..3).map(|k| w.get(k, j).unwrap() * input[k]).sum::<f64>()
                + b.get(j, 0).unwrap();
            assert_relative_eq!(*value, sigmoid(z), epsilon = 1e-12);
        }
    }

    #[test]
    fn predict_rejects_wrong_input_width() {
        let mut net = Network::seeded(&[2, 2, 1], 0).unwrap();
        let err = net.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            NnError::DimensionMismatch { layer: "input", expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn train_rejects_wrong_target_width_without_touching_weights() {
        let mut net = Network::seeded(&[2, 2, 1], 0).unwrap();
        let before = net.weights().to_vec();
        let err = net.train(&[0.0, 1.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, NnError::DimensionMismatch { layer: "output", .. }));
        assert_eq!(net.weights(), &before[..]);
    }

    #[test]
    fn single_layer_update_matches_hand_computation() {
        let mut net = Network::seeded(&[2, 1], 4).unwrap();
        net.set_learning_rate(0.5);
        let w0 = net.weights()[0].clone();
        let b0 = net.biases()[0].clone();

        let input = [0.3, 0.9];
        let y = net.predict(&input).unwrap()[0];
        net.train(&input, &[1.0]).unwrap();

        let g = y * (1.0 - y) * (1.0 - y) * 0.5;
        assert_relative_eq!(net.biases()[0].get(0, 0).unwrap(), b0.get(0, 0).unwrap() + g, epsilon = 1e-12);
        for k in 0..2 {
            assert_relative_eq!(
                net.weights()[0].get(k, 0).unwrap(),
                w0.get(k, 0).unwrap() + input[k] * g,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn hidden_error_flows_through_updated_output_weights() {
        let mut net = Network::seeded(&[2, 2, 1], 19).unwrap();
        net.set_learning_rate(0.5);
        let w0 = net.weights()[0].clone();
        let b0 = net.biases()[0].clone();
        let w1 = net.weights()[1].clone();

        let input = [0.6, -0.4];
        let target = 0.2;
        let y = net.predict(&input).unwrap()[0];
        let h = net.outputs()[1].to_column().unwrap();
        net.train(&input, &[target]).unwrap();

        let g2 = y * (1.0 - y) * (target - y) * 0.5;
        for j in 0..2 {
            let updated_w1 = w1.get(j, 0).unwrap() + h[j] * g2;
            assert_relative_eq!(net.weights()[1].get(j, 0).unwrap(), updated_w1, epsilon = 1e-12);

            let hidden_error = updated_w1 * (target - y);
            let g1 = h[j] * (1.0 - h[j]) * hidden_error * 0.5;
            assert_relative_eq!(net.biases()[0].get(j, 0).unwrap(), b0.get(j, 0).unwrap() + g1, epsilon = 1e-12);
            for k in 0..2 {
                assert_relative_eq!(
                    net.weights()[0].get(k, j).unwrap(),
                    w0.get(k, j).unwrap() + input[k] * g1,
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn zero_learning_rate_freezes_parameters() {
        let mut net = Network::seeded(&[2, 3, 2], 8).unwrap();
        net.set_learning_rate(0.0);
        let weights = net.weights().to_vec();
        let biases = net.biases().to_vec();
        net.train(&[0.5, 0.5], &[1.0, 0.0]).unwrap();
        assert_eq!(net.weights(), &weights[..]);
        assert_eq!(net.biases(), &biases[..]);
    }

    #[test]
    fn one_step_reduces_error_on_the_same_pair() {
        let mut net = Network::seeded(&[2, 3, 1], 13).unwrap();
        net.set_learning_rate(0.1);
        let input = [0.4, 0.6];
        let target = [0.9];

        let before = net.train(&input, &target).unwrap();
        let after = MseLoss::loss(&net.predict(&input).unwrap(), &target);
        assert!(after < before, "error went from {before} to {after}");
    }

    #[test]
    fn from_parts_checks_shapes() {
        let net = Network::seeded(&[2, 3, 1], 1).unwrap();
        let mut weights = net.weights().to_vec();
        weights[1] = Matrix::zeros(1, 3);
        let err = Network::from_parts(vec![2, 3, 1], weights, net.biases().to_vec(), 1.0)
            .unwrap_err();
        assert!(matches!(err, NnError::CorruptModel(_)));
    }
}
