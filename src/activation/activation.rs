use std::f64::consts::E;

/// Logistic sigmoid, mapping any real into (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Sigmoid derivative expressed through the activated value `y = sigmoid(x)`.
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}
