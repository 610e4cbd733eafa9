// This binary crate is intentionally minimal.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run the demo with:
//   cargo run --example xor
fn main() {
    println!("matrix-nn: a feed-forward network trained by backpropagation.");
    println!("Run `cargo run --example xor` to see the XOR demo.");
}
