//! Configuration loading and parsing
//!
//! The configuration is compiled in from `purl.toml` and parsed at boot
//! with a small `no_std` parser.

pub mod toml;

use defmt::*;
use purl_core::KnitterConfig;

pub use self::toml::{parse_config, ParseError};

/// Embedded configuration (compiled into firmware)
const EMBEDDED_CONFIG: &str = include_str!("../../purl.toml");

/// Parse and validate the embedded config, falling back to defaults
pub fn load_config() -> KnitterConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("purl.toml parse error {:?}, using defaults", e);
            return KnitterConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("purl.toml rejected ({:?}), using defaults", e);
            KnitterConfig::default()
        }
    }
}
