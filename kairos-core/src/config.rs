//! Configuration type definitions
//!
//! The firmware embeds a TOML file and parses it into `AppConfig` before
//! any task starts. Validation failures are startup-fatal; there is nothing
//! sensible the device can do with an empty SSID or API key.

use heapless::String;

use crate::cities::MAX_CITY_LEN;

/// Largest timezone offset in use anywhere (UTC+14/-12 fits well inside)
pub const MAX_TZ_OFFSET_SECONDS: i32 = 14 * 3600;

/// Configuration errors (fatal at startup)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Wi-Fi SSID missing or empty
    MissingSsid,
    /// Weather API key missing or empty
    MissingApiKey,
    /// Default city missing or empty
    MissingCity,
    /// Timezone offset beyond any real timezone
    TzOffsetOutOfRange,
}

/// Appliance configuration, loaded once before startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub wifi_ssid: String<32>,
    pub wifi_password: String<64>,
    /// OpenWeatherMap API key
    pub api_key: String<48>,
    /// Initially selected city (index 0 of the selection list)
    pub default_city: String<MAX_CITY_LEN>,
    /// Optional additional city offered in the settings list
    pub extra_city: Option<String<MAX_CITY_LEN>>,
    /// Fixed offset from UTC in seconds (no DST handling)
    pub tz_offset_seconds: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            api_key: String::new(),
            default_city: String::new(),
            extra_city: None,
            // CET
            tz_offset_seconds: 3600,
        }
    }
}

impl AppConfig {
    /// Check the loaded configuration; any error here aborts startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wifi_ssid.trim().is_empty() {
            return Err(ConfigError::MissingSsid);
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.default_city.trim().is_empty() {
            return Err(ConfigError::MissingCity);
        }
        if self.tz_offset_seconds.abs() > MAX_TZ_OFFSET_SECONDS {
            return Err(ConfigError::TzOffsetOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.wifi_ssid = String::try_from("home").unwrap();
        config.api_key = String::try_from("0123456789abcdef").unwrap();
        config.default_city = String::try_from("Berlin").unwrap();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(valid_config().validate(), Ok(()));
    }

    #[test]
    fn test_missing_fields_are_fatal() {
        let mut config = valid_config();
        config.wifi_ssid = String::new();
        assert_eq!(config.validate(), Err(ConfigError::MissingSsid));

        let mut config = valid_config();
        config.api_key = String::try_from("   ").unwrap();
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));

        let mut config = valid_config();
        config.default_city = String::new();
        assert_eq!(config.validate(), Err(ConfigError::MissingCity));
    }

    #[test]
    fn test_tz_offset_bounds() {
        let mut config = valid_config();
        config.tz_offset_seconds = -12 * 3600;
        assert_eq!(config.validate(), Ok(()));
        config.tz_offset_seconds = 15 * 3600;
        assert_eq!(config.validate(), Err(ConfigError::TzOffsetOutOfRange));
    }
}
