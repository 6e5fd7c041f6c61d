//! Wi-Fi bring-up and network stack
//!
//! Brings the station interface up with DHCP and keeps the association
//! alive. Producers treat the stack as an opaque collaborator and retry
//! until it is usable, so nothing here blocks the boot.

use embassy_executor::Spawner;
use embassy_net::{Config, Runner, Stack, StackResources};
use embassy_time::{with_timeout, Duration, Timer};
use esp_hal::peripherals::WIFI;
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};
use esp_radio::Controller;
use log::{info, warn};
use static_cell::StaticCell;

use kairos_core::config::AppConfig;

const LINK_TIMEOUT_SECS: u64 = 30;
const DHCP_TIMEOUT_SECS: u64 = 10;
const RECONNECT_POLL_SECS: u64 = 5;

static RADIO_CONTROLLER: StaticCell<Controller> = StaticCell::new();
static STACK_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

/// Network bring-up errors (startup-fatal; there is no appliance without
/// a radio)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// Radio driver failed to initialize
    RadioInit,
    /// Network stack or task setup failed
    StackInit,
}

/// Initialize the Wi-Fi station and return the network stack
pub fn init(
    spawner: &Spawner,
    wifi: WIFI<'static>,
    config: &'static AppConfig,
) -> Result<Stack<'static>, NetError> {
    let radio = RADIO_CONTROLLER.init(esp_radio::init().map_err(|_| NetError::RadioInit)?);
    let (controller, interfaces) =
        esp_radio::wifi::new(radio, wifi, Default::default()).map_err(|_| NetError::RadioInit)?;
    let device = interfaces.sta;

    let seed = getrandom::u64().map_err(|_| NetError::StackInit)?;
    let resources = STACK_RESOURCES.init(StackResources::new());
    let (stack, runner) =
        embassy_net::new(device, Config::dhcpv4(Default::default()), resources, seed);

    spawner.spawn(net_task(runner)).map_err(|_| NetError::StackInit)?;
    spawner
        .spawn(connection_task(controller, stack, config))
        .map_err(|_| NetError::StackInit)?;

    Ok(stack)
}

/// Network stack runner
#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Associate with the configured network and keep the link alive
#[embassy_executor::task]
async fn connection_task(
    mut controller: WifiController<'static>,
    stack: Stack<'static>,
    config: &'static AppConfig,
) {
    info!("Connecting to Wi-Fi network {}", config.wifi_ssid);

    let client_config = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(config.wifi_ssid.as_str().into())
            .with_password(config.wifi_password.as_str().into()),
    );
    if controller.set_config(&client_config).is_err() {
        warn!("Failed to apply Wi-Fi configuration");
    }
    if controller.start().is_err() {
        warn!("Failed to start Wi-Fi controller");
    }
    if controller.connect().is_err() {
        warn!("Wi-Fi connect request failed");
    }

    if with_timeout(Duration::from_secs(LINK_TIMEOUT_SECS), wait_for_link(stack))
        .await
        .is_err()
    {
        warn!("Wi-Fi link not up after {}s, still retrying", LINK_TIMEOUT_SECS);
    }
    if with_timeout(Duration::from_secs(DHCP_TIMEOUT_SECS), wait_for_ip(stack))
        .await
        .is_err()
    {
        warn!("No DHCP lease after {}s, still retrying", DHCP_TIMEOUT_SECS);
    }

    // Reconnect whenever the association drops; producers tolerate the gap
    loop {
        if !stack.is_link_up() {
            warn!("Wi-Fi link down, reconnecting");
            let _ = controller.connect();
        }
        Timer::after_secs(RECONNECT_POLL_SECS).await;
    }
}

async fn wait_for_link(stack: Stack<'static>) {
    while !stack.is_link_up() {
        Timer::after_millis(100).await;
    }
    info!("Wi-Fi link is up");
}

async fn wait_for_ip(stack: Stack<'static>) {
    loop {
        if let Some(config) = stack.config_v4() {
            info!("Got IP address {}", config.address);
            break;
        }
        Timer::after_millis(100).await;
    }
}
