//! Config validation CLI tool
//!
//! Validates a bookwarden configuration file and reports any errors.

use bookwarden_config::{ConfigError, GroupRule, CURRENT_CONFIG_VERSION};
use bookwarden_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a bookwarden configuration file.");
            eprintln!();
            eprintln!("Default location: {}", default_path.display());
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match bookwarden_config::load_config(&config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", CURRENT_CONFIG_VERSION);
            println!("  Bind: {}", config.server.bind);
            println!("  Groups: {}", config.groups.len());

            if !config.groups.is_empty() {
                println!();
                println!("Groups:");
                for group in &config.groups {
                    println!("  - {} ({}): {}", group.slug, group.name, describe_rule(&group.rule));
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver, CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}

fn describe_rule(rule: &GroupRule) -> String {
    let mut parts = Vec::new();

    if let Some(days) = rule.reservation_open_days_before {
        parts.push(format!("opens {}d ahead", days));
    }
    if let Some(minutes) = rule.reservation_close_minutes_before {
        parts.push(format!("closes {}m before", minutes));
    }
    if let Some(cap) = rule.max_simultaneous_reservations {
        parts.push(format!("max {} active", cap));
    }
    if let Some(hours) = rule.max_weekly_hours {
        parts.push(format!("max {}h/week", hours));
    }
    if let Some(ranges) = rule.allowed_time_ranges.as_ref().filter(|r| !r.is_empty()) {
        let spans: Vec<String> = ranges
            .iter()
            .map(|r| format!("{}-{}", r.start, r.end))
            .collect();
        parts.push(format!("hours {}", spans.join(",")));
    }
    if !rule.restricted_weekdays.is_empty() {
        parts.push(format!("closed on {:?}", rule.restricted_weekdays.indices()));
    }
    if rule.requires_host_approval {
        parts.push("host approval".into());
    }

    if parts.is_empty() {
        "unrestricted".into()
    } else {
        parts.join(", ")
    }
}
