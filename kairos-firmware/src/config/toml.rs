//! Simple TOML parser for the appliance configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the Kairos configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Arrays, inline tables, datetimes
//! - Dotted keys

use kairos_core::config::AppConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Line is neither a section header nor `key = value`
    InvalidKeyValue,
    /// String value not wrapped in double quotes
    InvalidString,
    /// Integer value did not parse
    InvalidInteger,
    /// Value exceeds its field's fixed capacity
    ValueTooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy)]
enum Section {
    Root,
    Wifi,
    Weather,
    Clock,
}

/// Parse TOML configuration into an `AppConfig`
///
/// Unknown keys are skipped so old firmware keeps booting with a newer
/// config file.
pub fn parse_config(input: &str) -> Result<AppConfig, ParseError> {
    let mut config = AppConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Section header
        if line.starts_with('[') {
            section = match line {
                "[wifi]" => Section::Wifi,
                "[weather]" => Section::Weather,
                "[clock]" => Section::Clock,
                _ => return Err(ParseError::InvalidSection),
            };
            continue;
        }

        let (key, value) = split_key_value(line)?;
        match section {
            Section::Wifi => match key {
                "ssid" => config.wifi_ssid = parse_string(value)?,
                "password" => config.wifi_password = parse_string(value)?,
                _ => {}
            },
            Section::Weather => match key {
                "api_key" => config.api_key = parse_string(value)?,
                "city" => config.default_city = parse_string(value)?,
                "extra_city" => config.extra_city = Some(parse_string(value)?),
                _ => {}
            },
            Section::Clock => match key {
                "tz_offset_seconds" => config.tz_offset_seconds = parse_integer(value)?,
                _ => {}
            },
            Section::Root => {}
        }
    }

    Ok(config)
}

fn split_key_value(line: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = line.split_once('=').ok_or(ParseError::InvalidKeyValue)?;
    Ok((key.trim(), strip_comment(value.trim())))
}

/// Drop a trailing `# comment` from unquoted values
fn strip_comment(value: &str) -> &str {
    if value.starts_with('"') {
        return value;
    }
    match value.split_once('#') {
        Some((before, _)) => before.trim(),
        None => value,
    }
}

fn parse_string<const N: usize>(value: &str) -> Result<heapless::String<N>, ParseError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(ParseError::InvalidString)?;
    heapless::String::try_from(inner).map_err(|_| ParseError::ValueTooLong)
}

fn parse_integer(value: &str) -> Result<i32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# appliance config

[wifi]
ssid = "home"
password = "hunter2"

[weather]
api_key = "deadbeef"
city = "Berlin"
extra_city = "Paris"

[clock]
tz_offset_seconds = 3600 # CET
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.wifi_ssid, "home");
        assert_eq!(config.wifi_password, "hunter2");
        assert_eq!(config.api_key, "deadbeef");
        assert_eq!(config.default_city, "Berlin");
        assert_eq!(config.extra_city.as_deref(), Some("Paris"));
        assert_eq!(config.tz_offset_seconds, 3600);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_config("[wifi]\nssid = \"home\"\n").unwrap();
        assert_eq!(config.wifi_ssid, "home");
        assert_eq!(config.wifi_password, "");
        assert_eq!(config.extra_city, None);
        assert_eq!(config.tz_offset_seconds, 3600);
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let config = parse_config("[clock]\nntp_server = \"pool.ntp.org\"\n").unwrap();
        assert_eq!(config.tz_offset_seconds, 3600);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert_eq!(
            parse_config("[display]\nrows = 4\n"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_unquoted_string_is_rejected() {
        assert_eq!(
            parse_config("[wifi]\nssid = home\n"),
            Err(ParseError::InvalidString)
        );
    }

    #[test]
    fn test_bad_integer_is_rejected() {
        assert_eq!(
            parse_config("[clock]\ntz_offset_seconds = \"one\"\n"),
            Err(ParseError::InvalidInteger)
        );
    }

    #[test]
    fn test_negative_offset_parses() {
        let config = parse_config("[clock]\ntz_offset_seconds = -18000\n").unwrap();
        assert_eq!(config.tz_offset_seconds, -18000);
    }
}
