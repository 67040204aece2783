//! Build script for purl-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates purl.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pins wired to the host UART
const HOST_UART_PINS: [u32; 2] = [0, 1];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate purl.toml at compile time
///
/// The firmware falls back to defaults on a bad config, so anything
/// caught here would otherwise only show up as a warning on the probe.
fn validate_config() {
    println!("cargo:rerun-if-changed=purl.toml");

    let config_path = Path::new("purl.toml");
    if !config_path.exists() {
        fail("purl.toml not found", &["Create one in the purl-firmware directory."]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read purl.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
            fail("Invalid TOML syntax in purl.toml", &lines)
        }
    };

    let mut errors = Vec::new();
    for section in ["knitter", "pins", "host"] {
        if config.get(section).is_none() {
            errors.push(format!("Missing [{}] section", section));
        }
    }
    validate_knitter(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_host(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in purl.toml", &errors);
    }

    println!("cargo:warning=purl.toml validated successfully");
}

fn validate_knitter(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(knitter) = config.get("knitter") else {
        return;
    };
    for key in ["safety_threshold_ms", "loop_period_us", "status_interval_ms"] {
        match knitter.get(key) {
            None => {}
            Some(toml::Value::Integer(v)) if *v > 0 && *v <= i64::from(u32::MAX) => {}
            Some(_) => errors.push(format!("[knitter] {} must be a positive integer", key)),
        }
    }
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::Table(pins)) = config.get("pins") else {
        return;
    };

    let mut seen: Vec<(u32, String)> = Vec::new();
    for (name, value) in pins {
        let Some(s) = value.as_str() else {
            errors.push(format!("[pins] {} must be a string like \"gpio4\"", name));
            continue;
        };
        let Some(pin) = parse_pin(s) else {
            errors.push(format!("[pins] {} = \"{}\" is not a valid pin", name, s));
            continue;
        };
        if HOST_UART_PINS.contains(&pin) {
            errors.push(format!("[pins] {} uses gpio{}, reserved for the host UART", name, pin));
        }
        if let Some((_, other)) = seen.iter().find(|(p, _)| *p == pin) {
            errors.push(format!("[pins] {} and {} both use gpio{}", other, name, pin));
        }
        seen.push((pin, name.clone()));
    }
}

fn validate_host(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(host) = config.get("host") else {
        return;
    };
    match host.get("baudrate") {
        None => {}
        Some(toml::Value::Integer(v)) if *v > 0 && *v <= i64::from(u32::MAX) => {}
        Some(_) => errors.push("[host] baudrate must be a positive integer".to_string()),
    }
}

/// "gpioN" or "!gpioN" with N < 30
fn parse_pin(s: &str) -> Option<u32> {
    let s = s.trim();
    let s = s.strip_prefix('!').unwrap_or(s);
    let pin: u32 = s.strip_prefix("gpio")?.parse().ok()?;
    (pin < 30).then_some(pin)
}

/// Abort the build with a boxed error message
fn fail<S: AsRef<str>>(title: &str, lines: &[S]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
