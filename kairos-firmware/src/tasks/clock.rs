//! Clock producer
//!
//! Every cycle: make sure the clock is anchored (bounded sync retries if it
//! is not), break the time down with the fixed timezone offset and publish
//! a fresh snapshot. Never raises to anyone; a failed sync just means the
//! next cycle tries again.

use embassy_time::{Duration, Ticker};
use log::{info, warn};

use kairos_core::clock::{ClockSnapshot, WallTime};
use kairos_core::traits::ClockSource;

use crate::channels::CLOCK_SNAPSHOT;
use crate::sntp::SntpClock;

/// Seconds between snapshot updates
pub const CLOCK_INTERVAL_SECS: u64 = 5;

const SYNC_ATTEMPT_TIMEOUT_MS: u32 = 2000;
const SYNC_MAX_RETRIES: u8 = 10;

/// Clock task - keeps the published date/time snapshot fresh
#[embassy_executor::task]
pub async fn clock_task(mut source: SntpClock, tz_offset_seconds: i32) {
    info!("Clock task started");

    let mut ticker = Ticker::every(Duration::from_secs(CLOCK_INTERVAL_SECS));

    loop {
        if !source.is_synchronized() {
            info!("Clock not set yet, requesting time sync");
            if !source
                .request_sync(SYNC_ATTEMPT_TIMEOUT_MS, SYNC_MAX_RETRIES)
                .await
            {
                warn!("Time sync failed, continuing with unsynchronized clock");
            }
        }

        let wall = wall_time_at(source.now(), tz_offset_seconds);
        CLOCK_SNAPSHOT.signal(ClockSnapshot::from_wall_time(&wall));

        ticker.next().await;
    }
}

/// Break unix time down into local wall time with the fixed offset
fn wall_time_at(unix_seconds: i64, tz_offset_seconds: i32) -> WallTime {
    let timestamp =
        jiff::Timestamp::from_second(unix_seconds).unwrap_or(jiff::Timestamp::UNIX_EPOCH);
    let offset = jiff::tz::Offset::from_seconds(tz_offset_seconds).unwrap_or(jiff::tz::Offset::UTC);
    let datetime = offset.to_datetime(timestamp);

    WallTime {
        year: datetime.year().max(0) as u16,
        month: datetime.month() as u8,
        day: datetime.day() as u8,
        hour: datetime.hour() as u8,
        minute: datetime.minute() as u8,
    }
}
