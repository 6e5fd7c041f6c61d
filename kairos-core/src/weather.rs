//! Weather snapshot and OpenWeatherMap payload parsing
//!
//! The weather producer reads a raw HTTP response, cuts it down to the JSON
//! body and parses the handful of fields the UI shows. Temperatures arrive
//! in Kelvin and are converted on parse.

use heapless::String;
use serde::Deserialize;

use crate::cities::MAX_CITY_LEN;

/// Placeholder shown while no weather data is available
pub const NO_INTERNET: &str = "No internet";

const KELVIN_OFFSET: f32 = 273.15;

/// Convert a Kelvin reading to Celsius
pub fn kelvin_to_celsius(kelvin: f32) -> f32 {
    kelvin - KELVIN_OFFSET
}

/// Latest parsed weather record, replaced wholesale on each fetch
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherSnapshot {
    pub temperature_c: f32,
    pub feels_like_c: f32,
    pub humidity_pct: u8,
    pub country_code: String<4>,
    pub city_name: String<MAX_CITY_LEN>,
}

/// Payload errors; the producer degrades to an absent snapshot on any of
/// these
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// No JSON object found in the response
    NoBody,
    /// Body is not valid UTF-8
    Encoding,
    /// Body does not match the expected OpenWeatherMap shape
    Malformed,
}

#[derive(Deserialize)]
struct Payload {
    main: PayloadMain,
    sys: PayloadSys,
    name: String<MAX_CITY_LEN>,
}

#[derive(Deserialize)]
struct PayloadMain {
    temp: f32,
    feels_like: f32,
    humidity: u8,
}

#[derive(Deserialize)]
struct PayloadSys {
    country: String<4>,
}

/// Cut a raw HTTP response down to its JSON body
///
/// Takes everything from the first `{` to end of stream, skipping status
/// line and headers (and any stray HTML an intermediary may have injected).
pub fn extract_json(raw: &[u8]) -> Result<&str, PayloadError> {
    let start = raw
        .iter()
        .position(|&byte| byte == b'{')
        .ok_or(PayloadError::NoBody)?;
    core::str::from_utf8(&raw[start..]).map_err(|_| PayloadError::Encoding)
}

/// Parse an OpenWeatherMap current-weather body into a snapshot
pub fn parse_current(body: &str) -> Result<WeatherSnapshot, PayloadError> {
    let payload: Payload = serde_json::from_str(body).map_err(|_| PayloadError::Malformed)?;
    Ok(WeatherSnapshot {
        temperature_c: kelvin_to_celsius(payload.main.temp),
        feels_like_c: kelvin_to_celsius(payload.main.feels_like),
        humidity_pct: payload.main.humidity,
        country_code: payload.sys.country,
        city_name: payload.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coord": {"lon": -0.13, "lat": 51.51},
        "weather": [{"id": 300, "main": "Drizzle", "description": "light drizzle"}],
        "main": {"temp": 285.45, "feels_like": 284.13, "pressure": 1012, "humidity": 81},
        "sys": {"type": 1, "id": 1414, "country": "GB", "sunrise": 1560343627},
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn test_kelvin_conversion_is_exact() {
        assert_eq!(kelvin_to_celsius(273.15), 0.0);
        assert_eq!(kelvin_to_celsius(285.45), 285.45 - 273.15);
        assert_eq!(kelvin_to_celsius(0.0), -273.15);
    }

    #[test]
    fn test_parse_current_extracts_ui_fields() {
        let snapshot = parse_current(SAMPLE).unwrap();
        assert_eq!(snapshot.temperature_c, 285.45 - 273.15);
        assert_eq!(snapshot.feels_like_c, 284.13 - 273.15);
        assert_eq!(snapshot.humidity_pct, 81);
        assert_eq!(snapshot.country_code, "GB");
        assert_eq!(snapshot.city_name, "London");
    }

    #[test]
    fn test_extract_json_skips_headers() {
        let raw = b"HTTP/1.0 200 OK\r\nContent-Type: application/json\r\n\r\n{\"a\":1}";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_json_without_body_fails() {
        assert_eq!(
            extract_json(b"HTTP/1.0 502 Bad Gateway\r\n\r\n"),
            Err(PayloadError::NoBody)
        );
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert_eq!(
            parse_current("{\"main\": {}}"),
            Err(PayloadError::Malformed)
        );
        assert_eq!(parse_current("not json"), Err(PayloadError::Malformed));
    }

    #[test]
    fn test_end_to_end_from_raw_response() {
        let mut raw = alloc::vec::Vec::new();
        raw.extend_from_slice(b"HTTP/1.0 200 OK\r\n\r\n");
        raw.extend_from_slice(SAMPLE.as_bytes());
        let body = extract_json(&raw).unwrap();
        let snapshot = parse_current(body).unwrap();
        assert_eq!(snapshot.city_name, "London");
    }
}
