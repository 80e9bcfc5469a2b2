//! Configuration for selecting a reconstruction distribution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::distribution::GaussianReconstructionDistribution;
use crate::error::{ReconError, Result};

/// Configuration for a Gaussian reconstruction distribution.
///
/// Activation names are resolved when the configuration is parsed, so an
/// unknown name is rejected here rather than during training.
///
/// # Example
///
/// ```rust
/// use vae_recon::{Activation, ReconstructionConfig};
///
/// # fn main() -> vae_recon::Result<()> {
/// let config = ReconstructionConfig::from_yaml_str("activation: tanh\ndata_size: 784\n")?;
/// assert_eq!(config.activation, Activation::Tanh);
/// assert_eq!(config.distribution_input_size(), Some(1568));
///
/// let dist = config.build()?;
/// assert_eq!(dist.to_string(), "GaussianReconstructionDistribution(afn=tanh)");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Activation applied to the decoder output before it is split into
    /// mean and log-variance.
    pub activation: Activation,

    /// Number of data dimensions being reconstructed, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<usize>,
}

impl ReconstructionConfig {
    /// Create a configuration with the identity activation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the activation.
    #[must_use]
    pub const fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Set the number of data dimensions.
    #[must_use]
    pub const fn with_data_size(mut self, data_size: usize) -> Self {
        self.data_size = Some(data_size);
        self
    }

    /// Number of decoder outputs required, when `data_size` is set.
    #[must_use]
    pub fn distribution_input_size(&self) -> Option<usize> {
        self.data_size.map(|d| 2 * d)
    }

    /// Parse a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed or names an unknown activation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize the configuration to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!("Loaded reconstruction config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Save the configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if `data_size` is set to zero.
    pub fn validate(&self) -> Result<()> {
        if self.data_size == Some(0) {
            return Err(ReconError::InvalidConfig(
                "data_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and build the distribution.
    ///
    /// # Errors
    ///
    /// Returns error if validation fails.
    pub fn build(&self) -> Result<GaussianReconstructionDistribution> {
        self.validate()?;
        let dist = GaussianReconstructionDistribution::new(self.activation);
        tracing::debug!("Built {}", dist);
        Ok(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReconstructionConfig::default();
        assert_eq!(config.activation, Activation::Identity);
        assert_eq!(config.data_size, None);
        assert_eq!(config.distribution_input_size(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ReconstructionConfig::new()
            .with_activation(Activation::Tanh)
            .with_data_size(10);

        assert_eq!(config.activation, Activation::Tanh);
        assert_eq!(config.distribution_input_size(), Some(20));
        assert_eq!(config.build().unwrap().activation(), Activation::Tanh);
    }

    #[test]
    fn test_validation() {
        let invalid = ReconstructionConfig::new().with_data_size(0);
        assert!(matches!(invalid.validate(), Err(ReconError::InvalidConfig(_))));
        assert!(invalid.build().is_err());
    }

    #[test]
    fn test_yaml_defaults() {
        let config = ReconstructionConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ReconstructionConfig::default());
    }

    #[test]
    fn test_yaml_unknown_activation() {
        let err = ReconstructionConfig::from_yaml_str("activation: swish9000\n").unwrap_err();
        match err {
            ReconError::Serialization(msg) => assert!(msg.contains("swish9000"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ReconstructionConfig::new()
            .with_activation(Activation::LeakyRelu)
            .with_data_size(3);
        let yaml = config.to_yaml_string().unwrap();
        assert!(yaml.contains("leakyrelu"));
        assert_eq!(ReconstructionConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
