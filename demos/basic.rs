//! Score a batch under a Gaussian reconstruction distribution and take one
//! gradient step on the decoder output.
//!
//! Run with `RUST_LOG=trace cargo run --example basic`.

use candle_core::{Device, Tensor};
use tracing_subscriber::EnvFilter;
use vae_recon::{Activation, ReconstructionConfig, ReconstructionDistribution};

fn main() -> vae_recon::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let device = Device::Cpu;
    let config = ReconstructionConfig::new()
        .with_activation(Activation::Tanh)
        .with_data_size(16);
    let dist = config.build()?;
    println!("{dist}");

    let data_size = 16;
    let x = Tensor::randn(0.0f32, 0.5, (8, data_size), &device)?;
    let mut params = Tensor::zeros(
        (8, dist.distribution_input_size(data_size)),
        candle_core::DType::F32,
        &device,
    )?;

    let learning_rate = 0.05;
    for step in 0..5 {
        let loss = dist.neg_log_probability(&x, &params, true)?;
        println!("step {step}: mean negative log-likelihood = {loss:.4}");

        // Gradient ascent on log p, averaged over the batch
        let grad = dist.gradient(&x, &params)?;
        params = (params + grad.affine(learning_rate / 8.0, 0.0)?)?;
    }

    let reconstruction = dist.generate_at_mean(&params)?;
    println!("reconstruction shape: {:?}", reconstruction.dims());
    Ok(())
}
