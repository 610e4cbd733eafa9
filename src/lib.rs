pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use network::network::Network;
pub use network::snapshot::NetworkSnapshot;
pub use network::spec::NetworkSpec;
pub use loss::mse::MseLoss;
pub use train::{train_loop, train_network, EpochStats, TrainConfig};
