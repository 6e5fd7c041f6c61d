//! Collaborator traits
//!
//! Contracts between the producers and their platform-specific backends.
//! The firmware provides SNTP and raw-socket HTTP implementations; tests can
//! substitute anything that speaks these interfaces.

use crate::weather::WeatherSnapshot;

/// Source of wall-clock time for the clock producer
pub trait ClockSource {
    /// Current unix time in seconds (may be nonsense before the first sync)
    fn now(&self) -> i64;

    /// True once a successful sync has anchored the clock
    fn is_synchronized(&self) -> bool;

    /// Try to synchronize, waiting at most `timeout_ms` per attempt
    ///
    /// Returns true on success. Failure is not fatal; the caller proceeds
    /// with whatever time is available and retries on its next cycle.
    async fn request_sync(&mut self, timeout_ms: u32, max_retries: u8) -> bool;
}

/// Network failures the weather producer recovers from locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchError {
    /// Host name did not resolve
    Dns,
    /// TCP connection failed or timed out
    Connect,
    /// Sending the request failed
    Send,
    /// Receiving the response failed or timed out
    Receive,
    /// Response could not be parsed into a weather record
    Payload,
}

/// Source of weather records for the weather producer
pub trait WeatherSource {
    /// Fetch the current weather for `city`
    async fn fetch(&mut self, city: &str) -> Result<WeatherSnapshot, FetchError>;
}
