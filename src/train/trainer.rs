use crate::error::{NnError, Result};
use crate::network::network::Network;

/// One pass over the dataset in order, one `Network::train` call per sample.
/// Returns the mean loss of the forward passes.
pub fn train_network(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
) -> Result<f64> {
    check_dataset(inputs, expected_outputs)?;

    let mut total_loss = 0.0;
    for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
        total_loss += network.train(input, expected)?;
    }

    Ok(total_loss / inputs.len() as f64)
}

pub(crate) fn check_dataset(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    if inputs.is_empty() {
        return Err(NnError::InvalidDataset("no samples".to_string()));
    }
    if inputs.len() != targets.len() {
        return Err(NnError::InvalidDataset(format!(
            "{} inputs but {} targets",
            inputs.len(),
            targets.len()
        )));
    }
    Ok(())
}
