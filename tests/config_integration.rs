//! Integration tests for loading distribution configuration from disk.

use candle_core::{Device, Tensor};
use tempfile::TempDir;
use vae_recon::{Activation, ReconError, ReconstructionConfig, ReconstructionDistribution};

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recon.yaml");

    let config = ReconstructionConfig::new()
        .with_activation(Activation::Tanh)
        .with_data_size(12);
    config.save(&path).unwrap();

    let loaded = ReconstructionConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.distribution_input_size(), Some(24));
}

#[test]
fn test_loaded_config_drives_distribution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recon.yaml");
    std::fs::write(&path, "activation: softsign\ndata_size: 3\n").unwrap();

    let config = ReconstructionConfig::from_file(&path).unwrap();
    let dist = config.build().unwrap();
    assert_eq!(dist.activation(), Activation::Softsign);

    let device = Device::Cpu;
    let data_size = config.data_size.unwrap();
    let x = Tensor::randn(0.0f32, 1.0, (2, data_size), &device).unwrap();
    let params = Tensor::randn(
        0.0f32,
        1.0,
        (2, dist.distribution_input_size(data_size)),
        &device,
    )
    .unwrap();

    let grad = dist.gradient(&x, &params).unwrap();
    assert_eq!(grad.dims(), &[2, 6]);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ReconstructionConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ReconError::Io(_)));
}

#[test]
fn test_invalid_data_size_in_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recon.yaml");
    std::fs::write(&path, "activation: identity\ndata_size: 0\n").unwrap();

    let config = ReconstructionConfig::from_file(&path).unwrap();
    assert!(matches!(config.build(), Err(ReconError::InvalidConfig(_))));
}
