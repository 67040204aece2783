//! Simple TOML parser for the firmware configuration
//!
//! Handles only the subset `purl.toml` uses. It does NOT support the full
//! TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Comments (# ...)

use purl_core::{KnitterConfig, PinSpec};
use purl_hal_rp2040::parse_pin_string;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Knitter,
    Pins,
    Host,
}

/// Parse TOML configuration into a [`KnitterConfig`]
///
/// Keys that are missing keep their defaults. Unknown keys are ignored.
pub fn parse_config(input: &str) -> Result<KnitterConfig, ParseError> {
    let mut config = KnitterConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = parse_section_header(header)?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "knitter" => Ok(Section::Knitter),
        "pins" => Ok(Section::Pins),
        "host" => Ok(Section::Host),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`, dropping a trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // A # inside a string is not a comment
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse an integer value, allowing `_` separators
fn parse_int(value: &str) -> Result<u32, ParseError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_pin(value: &str) -> Result<PinSpec, ParseError> {
    parse_pin_string(parse_string(value)).ok_or(ParseError::InvalidPin)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut KnitterConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Knitter => match key {
            "safety_threshold_ms" => config.safety_threshold_ms = parse_int(value)?,
            "loop_period_us" => config.loop_period_us = parse_int(value)?,
            "status_interval_ms" => config.status_interval_ms = parse_int(value)?,
            _ => {} // Ignore unknown keys
        },
        Section::Pins => {
            let pins = &mut config.pins;
            match key {
                "range" => pins.range = parse_pin(value)?,
                "clock" => pins.clock = parse_pin(value)?,
                "solenoid" => pins.solenoid = parse_pin(value)?,
                "direction" => pins.direction = parse_pin(value)?,
                "fault_led" => pins.fault_led = parse_pin(value)?,
                _ => {}
            }
        }
        Section::Host => {
            if key == "baudrate" {
                config.baudrate = parse_int(value)?;
            }
        }
        Section::Root => {}
    }
    Ok(())
}
