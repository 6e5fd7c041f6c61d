//! Tick task for time-based updates
//!
//! Provides the periodic refresh tick the menu task consumes. Keeping the
//! timer out of the menu task means key handling and refresh both arrive
//! through the same serialized select loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use log::info;

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Signal to notify the menu task of a tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - sends periodic tick signals with a timestamp
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let start = Instant::now();

    loop {
        ticker.next().await;
        let now_ms = start.elapsed().as_millis() as u32;
        TICK_SIGNAL.signal(now_ms);
    }
}
