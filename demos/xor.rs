use matrix_nn::{train_loop, Network, TrainConfig};

fn main() -> matrix_nn::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut network = Network::seeded(&[2, 4, 1], 2024)?;
    network.set_learning_rate(0.5);

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let expected_outputs = vec![
        vec![0.0],
        vec![1.0],
        vec![1.0],
        vec![0.0],
    ];

    let config = TrainConfig::new(10_000).shuffled(Some(7)).log_every(1000);
    let loss = train_loop(&mut network, &inputs, &expected_outputs, &config)?;
    println!("Final loss = {loss:.6}");

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.predict(input)?[0]);
    }

    Ok(())
}
