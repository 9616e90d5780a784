//! Centralized Configuration Management
//!
//! Configuration for the registry runtime: control channel sizing, dispatch
//! policy and logging. Every section has sensible defaults, so an empty TOML
//! document is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::DebugParams;
use crate::errors::{HalError, HalResult};
use crate::wire::DebugLevel;

// ----------------------------------------------------------------------------
// Channel Configuration
// ----------------------------------------------------------------------------

/// Configuration for the control loop command channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Buffer size for commands sent to the control loop
    pub command_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 128, // radio events can be bursty
        }
    }
}

impl ChannelConfig {
    /// Create configuration optimized for testing
    pub fn testing() -> Self {
        Self {
            command_buffer_size: 16,
        }
    }
}

// ----------------------------------------------------------------------------
// Dispatch Configuration
// ----------------------------------------------------------------------------

/// Policy applied by the dispatcher during fan-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Drop listeners whose endpoint reported dead during a fan-out
    pub prune_dead_listeners: bool,
    /// Maximum listeners registered under one scope
    pub max_listeners_per_scope: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            prune_dead_listeners: true,
            max_listeners_per_scope: 32,
        }
    }
}

// ----------------------------------------------------------------------------
// Logging Configuration
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: DebugLevel,
    pub show_timestamp: bool,
    /// Include key material in debug output
    pub show_keys: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DebugLevel::Info,
            show_timestamp: true,
            show_keys: false,
        }
    }
}

impl LoggingConfig {
    pub fn debug_params(&self) -> DebugParams {
        DebugParams {
            level: self.level,
            show_timestamp: self.show_timestamp,
            show_keys: self.show_keys,
        }
    }
}

// ----------------------------------------------------------------------------
// Vendor Configuration
// ----------------------------------------------------------------------------

/// Vendor extension service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Register vendor objects alongside the standard ones
    pub enabled: bool,
}

// ----------------------------------------------------------------------------
// Top-level Configuration
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalConfig {
    pub channels: ChannelConfig,
    pub dispatch: DispatchConfig,
    pub logging: LoggingConfig,
    pub vendor: VendorConfig,
}

impl HalConfig {
    /// Create configuration for tests: small channels, verbose logging
    pub fn testing() -> Self {
        Self {
            channels: ChannelConfig::testing(),
            dispatch: DispatchConfig::default(),
            logging: LoggingConfig {
                level: DebugLevel::Debug,
                show_timestamp: false,
                show_keys: false,
            },
            vendor: VendorConfig::default(),
        }
    }

    /// Configuration for tests with the vendor service enabled
    pub fn testing_with_vendor() -> Self {
        Self {
            vendor: VendorConfig { enabled: true },
            ..Self::testing()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> HalResult<Self> {
        let config: HalConfig = toml::from_str(source)
            .map_err(|e| HalError::config_error(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> HalResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            HalError::config_error(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> HalResult<String> {
        toml::to_string_pretty(self).map_err(|e| HalError::config_error(e.to_string()))
    }

    pub fn validate(&self) -> HalResult<()> {
        if self.channels.command_buffer_size == 0 {
            return Err(HalError::config_error(
                "channels.command_buffer_size must be greater than zero",
            ));
        }
        if self.dispatch.max_listeners_per_scope == 0 {
            return Err(HalError::config_error(
                "dispatch.max_listeners_per_scope must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = HalConfig::from_toml_str("").unwrap();
        assert_eq!(config, HalConfig::default());
    }

    #[test]
    fn test_partial_sections_override() {
        let config = HalConfig::from_toml_str(
            r#"
            [dispatch]
            max_listeners_per_scope = 4

            [logging]
            level = "excessive"
            show_keys = true
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch.max_listeners_per_scope, 4);
        assert!(config.dispatch.prune_dead_listeners);
        assert_eq!(config.logging.level, DebugLevel::Excessive);
        assert!(config.logging.show_keys);
        assert_eq!(config.channels, ChannelConfig::default());
        assert!(!config.vendor.enabled);
    }

    #[test]
    fn test_vendor_section() {
        let config = HalConfig::from_toml_str("[vendor]\nenabled = true\n").unwrap();
        assert_eq!(config.vendor, HalConfig::testing_with_vendor().vendor);
    }

    #[test]
    fn test_validation_rejects_zero_sizes() {
        let err = HalConfig::from_toml_str("[channels]\ncommand_buffer_size = 0\n").unwrap_err();
        assert!(matches!(err, HalError::Configuration { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = HalConfig::testing();
        let text = config.to_toml_string().unwrap();
        assert_eq!(HalConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        assert!(HalConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").is_err());
    }
}
