//! OpenWeatherMap client over a raw TCP socket
//!
//! Speaks plain HTTP/1.0 like the appliance always has: resolve, connect,
//! send a hand-built GET, read until the server closes the connection, then
//! hand the bytes to the payload parser. Every step has a fixed timeout and
//! maps onto a `FetchError` the producer recovers from.

use core::fmt::Write as _;

use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use heapless::{String, Vec};
use log::debug;

use kairos_core::traits::{FetchError, WeatherSource};
use kairos_core::weather::{extract_json, parse_current, WeatherSnapshot};

pub const WEB_SERVER: &str = "api.openweathermap.org";
pub const WEB_PORT: u16 = 80;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const SOCKET_TIMEOUT_SECS: u64 = 5;
const RESPONSE_CAPACITY: usize = 2048;

pub struct OwmClient<'a> {
    stack: Stack<'static>,
    api_key: &'a str,
}

impl<'a> OwmClient<'a> {
    pub fn new(stack: Stack<'static>, api_key: &'a str) -> Self {
        Self { stack, api_key }
    }
}

impl WeatherSource for OwmClient<'_> {
    async fn fetch(&mut self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let addrs = self
            .stack
            .dns_query(WEB_SERVER, DnsQueryType::A)
            .await
            .map_err(|_| FetchError::Dns)?;
        let addr = *addrs.first().ok_or(FetchError::Dns)?;
        debug!("Resolved {} to {}", WEB_SERVER, addr);

        let mut rx_buffer = [0u8; 1024];
        let mut tx_buffer = [0u8; 512];
        let mut socket = TcpSocket::new(self.stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)));

        with_timeout(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            socket.connect((addr, WEB_PORT)),
        )
        .await
        .map_err(|_| FetchError::Connect)?
        .map_err(|_| FetchError::Connect)?;

        let request = build_request(city, self.api_key).ok_or(FetchError::Send)?;
        write_all(&mut socket, request.as_bytes())
            .await
            .map_err(|_| FetchError::Send)?;

        // HTTP/1.0: the server closes the connection after the response
        let mut response: Vec<u8, RESPONSE_CAPACITY> = Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            match socket.read(&mut chunk).await {
                Ok(0) => break,
                Ok(read) => {
                    let free = response.capacity() - response.len();
                    let take = read.min(free);
                    let _ = response.extend_from_slice(&chunk[..take]);
                    if take < read {
                        break;
                    }
                }
                Err(_) => return Err(FetchError::Receive),
            }
        }
        socket.close();

        let body = extract_json(&response).map_err(|_| FetchError::Payload)?;
        parse_current(body).map_err(|_| FetchError::Payload)
    }
}

/// Absolute-URI HTTP/1.0 GET, the request shape the API has accepted since
/// the first firmware revision
fn build_request(city: &str, api_key: &str) -> Option<String<384>> {
    let mut request = String::new();
    write!(
        request,
        "GET http://{WEB_SERVER}/data/2.5/weather?q={city}&appid={api_key} HTTP/1.0\r\n\
         Host: {WEB_SERVER}:{WEB_PORT}\r\n\
         User-Agent: kairos/0.1 esp32\r\n\
         \r\n"
    )
    .ok()?;
    Some(request)
}

async fn write_all(
    socket: &mut TcpSocket<'_>,
    mut data: &[u8],
) -> Result<(), embassy_net::tcp::Error> {
    while !data.is_empty() {
        let written = socket.write(data).await?;
        data = &data[written..];
    }
    Ok(())
}
