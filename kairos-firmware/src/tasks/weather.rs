//! Weather producer
//!
//! Fetches the selected city on a fixed interval with fixed-delay retry on
//! any network failure. A city change cancels the in-flight cycle - the
//! fetch future is dropped, which closes its socket - and the loop restarts
//! against the new selection, so two fetches never race to publish.

use embassy_futures::select::{select, Either};
use embassy_net::Stack;
use embassy_time::Timer;
use log::{info, warn};

use kairos_core::cities::CitySelectionList;
use kairos_core::config::AppConfig;
use kairos_core::traits::WeatherSource;

use crate::channels::{CITY_SELECT, WEATHER_SNAPSHOT};
use crate::owm::OwmClient;

/// Seconds between successful fetches
pub const WEATHER_INTERVAL_SECS: u64 = 60;

/// Backoff after a failed network step
pub const WEATHER_RETRY_SECS: u64 = 4;

/// Weather task - publishes snapshots for the selected city
#[embassy_executor::task]
pub async fn weather_task(
    stack: Stack<'static>,
    cities: &'static CitySelectionList,
    config: &'static AppConfig,
) {
    info!("Weather task started");

    let mut client = OwmClient::new(stack, config.api_key.as_str());
    let mut selected: usize = 0;

    loop {
        let Some(city) = cities.get(selected) else {
            selected = 0;
            continue;
        };

        match select(fetch_cycle(&mut client, city), CITY_SELECT.wait()).await {
            Either::First(()) => {}
            Either::Second(index) => {
                let index = index as usize;
                match cities.get(index) {
                    Some(next) => {
                        info!("Switching weather city to {}", next);
                        selected = index;
                    }
                    None => warn!("Ignoring out-of-range city index {}", index),
                }
            }
        }
    }
}

/// Fetch `city` forever: publish and sleep on success, back off on failure
async fn fetch_cycle(client: &mut OwmClient<'_>, city: &str) {
    loop {
        match client.fetch(city).await {
            Ok(snapshot) => {
                info!(
                    "Weather for {}: {:.1}C, humidity {}%",
                    city, snapshot.temperature_c, snapshot.humidity_pct
                );
                WEATHER_SNAPSHOT.signal(snapshot);
                Timer::after_secs(WEATHER_INTERVAL_SECS).await;
            }
            Err(e) => {
                warn!("Weather fetch for {} failed: {:?}, retrying", city, e);
                Timer::after_secs(WEATHER_RETRY_SECS).await;
            }
        }
    }
}
