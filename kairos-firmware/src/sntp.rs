//! SNTP clock source
//!
//! Anchors the wall clock by querying NTP over the embassy-net UDP stack.
//! `now` extrapolates from the last successful sync using the monotonic
//! timer; before the first sync the clock reads like a cold RTC (seconds
//! since boot, i.e. somewhere in 1970).

use core::net::{IpAddr, SocketAddr};

use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Instant, Timer};
use log::{debug, info, warn};
use sntpc::{get_time, NtpContext, NtpTimestampGenerator};

use kairos_core::traits::ClockSource;

const NTP_SERVERS: [&str; 2] = ["pool.ntp.org", "time.google.com"];
const NTP_PORT: u16 = 123;
const RETRY_PAUSE_SECS: u64 = 2;

/// Clock source anchored by SNTP
pub struct SntpClock {
    stack: Stack<'static>,
    /// Unix time of the last sync and the instant it happened
    anchor: Option<(i64, Instant)>,
}

impl SntpClock {
    pub fn new(stack: Stack<'static>) -> Self {
        Self {
            stack,
            anchor: None,
        }
    }

    /// One query round across the configured servers
    async fn query(&mut self, timeout_ms: u32) -> Option<i64> {
        let mut rx_meta = [PacketMetadata::EMPTY; 16];
        let mut rx_buffer = [0u8; 512];
        let mut tx_meta = [PacketMetadata::EMPTY; 16];
        let mut tx_buffer = [0u8; 512];

        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).ok()?;

        let context = NtpContext::new(UptimeTimestampGen::default());

        for server in NTP_SERVERS {
            let addrs = match self.stack.dns_query(server, DnsQueryType::A).await {
                Ok(addrs) => addrs,
                Err(_) => {
                    debug!("DNS query for {} failed", server);
                    continue;
                }
            };
            let Some(&addr) = addrs.first() else {
                continue;
            };
            let addr = SocketAddr::from((IpAddr::from(addr), NTP_PORT));

            let request = get_time(addr, &socket, context);
            match with_timeout(Duration::from_millis(timeout_ms as u64), request).await {
                Ok(Ok(result)) => {
                    let unix = result.sec() as i64;
                    info!("NTP time from {}: {}", server, unix);
                    return Some(unix);
                }
                Ok(Err(e)) => warn!("NTP request to {} failed: {:?}", server, e),
                Err(_) => warn!("NTP request to {} timed out", server),
            }
        }
        None
    }
}

impl ClockSource for SntpClock {
    fn now(&self) -> i64 {
        match self.anchor {
            Some((unix, at)) => unix + at.elapsed().as_secs() as i64,
            None => Instant::now().as_secs() as i64,
        }
    }

    fn is_synchronized(&self) -> bool {
        self.anchor.is_some()
    }

    async fn request_sync(&mut self, timeout_ms: u32, max_retries: u8) -> bool {
        for attempt in 1..=max_retries {
            if let Some(unix) = self.query(timeout_ms).await {
                self.anchor = Some((unix, Instant::now()));
                return true;
            }
            debug!("Time sync attempt {}/{} failed", attempt, max_retries);
            Timer::after_secs(RETRY_PAUSE_SECS).await;
        }
        false
    }
}

/// Timestamp generator for the NTP round-trip math, based on uptime
#[derive(Default, Clone, Copy)]
struct UptimeTimestampGen {
    started: Option<Instant>,
}

impl NtpTimestampGenerator for UptimeTimestampGen {
    fn init(&mut self) {
        self.started = Some(Instant::now());
    }

    fn timestamp_sec(&self) -> u64 {
        self.started.map(|start| start.elapsed().as_secs()).unwrap_or(0)
    }

    fn timestamp_subsec_micros(&self) -> u32 {
        self.started
            .map(|start| (start.elapsed().as_micros() % 1_000_000) as u32)
            .unwrap_or(0)
    }
}
