//! Kairos - Wi-Fi weather/clock appliance
//!
//! Main firmware binary for ESP32-C3 boards driving a 20x4 character LCD.
//! Joins Wi-Fi, syncs the clock over NTP, polls OpenWeatherMap and runs the
//! button-driven menu.
//!
//! Named after the Greek "kairos" (καιρός), which in modern Greek means
//! both "weather" and "the right moment".

#![no_std]
#![no_main]

extern crate alloc;

use embassy_executor::Spawner;
use embassy_time::Timer;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use log::{info, warn};
use static_cell::StaticCell;

use esp_backtrace as _;

use kairos_core::cities::CitySelectionList;
use kairos_core::config::AppConfig;
use kairos_core::menu::Registry;

mod buttons;
mod channels;
mod config;
mod hd44780;
mod net;
mod owm;
mod sntp;
mod tasks;

use crate::buttons::ButtonPins;
use crate::hd44780::{Hd44780, LCD_I2C_ADDR};
use crate::sntp::SntpClock;

esp_bootloader_esp_idf::esp_app_desc!();

/// Embedded configuration (compiled into the firmware)
/// Edit kairos.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../kairos.toml");

// Static cells for state shared across tasks (must live forever)
static CONFIG: StaticCell<AppConfig> = StaticCell::new();
static CITIES: StaticCell<CitySelectionList> = StaticCell::new();

/// Main entry point
#[esp_rtos::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 65536);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    esp_println::logger::init_logger_from_env();
    info!("Kairos firmware starting...");

    // The configuration is compiled in; anything invalid here is a build
    // mistake, so stop the boot rather than limp along
    let parsed = config::parse_config(EMBEDDED_CONFIG).expect("invalid embedded configuration");
    parsed.validate().expect("incomplete embedded configuration");
    let config: &'static AppConfig = CONFIG.init(parsed);

    let registry = Registry::build().expect("invalid screen registry");
    let cities: &'static CitySelectionList = CITIES.init(
        CitySelectionList::build(&config.default_city, config.extra_city.as_deref())
            .expect("invalid city configuration"),
    );
    info!(
        "{} cities selectable, default {}",
        cities.len(),
        config.default_city
    );

    // LCD over I2C (board-specific pins: SDA=GPIO6, SCL=GPIO7)
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(100)),
    )
    .expect("I2C init failed")
    .with_sda(peripherals.GPIO6)
    .with_scl(peripherals.GPIO7);

    let mut display = Hd44780::new(i2c, LCD_I2C_ADDR);
    if let Err(e) = display.init() {
        // Keep running; the menu is still observable through the log
        warn!("LCD init failed: {:?}", e);
    }

    // Navigation buttons (board-specific pins, active low)
    let pins = ButtonPins {
        ok: Input::new(peripherals.GPIO0, InputConfig::default().with_pull(Pull::Up)),
        prev: Input::new(peripherals.GPIO1, InputConfig::default().with_pull(Pull::Up)),
        next: Input::new(peripherals.GPIO2, InputConfig::default().with_pull(Pull::Up)),
        home: Input::new(peripherals.GPIO3, InputConfig::default().with_pull(Pull::Up)),
    };

    // Wi-Fi station + network stack; producers retry until it is usable
    let stack = net::init(&spawner, peripherals.WIFI, config).expect("network init failed");

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(buttons::button_task(pins)).unwrap();
    spawner.spawn(tasks::lcd_task(display)).unwrap();
    spawner.spawn(tasks::menu_task(registry, cities)).unwrap();
    spawner
        .spawn(tasks::clock_task(SntpClock::new(stack), config.tz_offset_seconds))
        .unwrap();
    spawner
        .spawn(tasks::weather_task(stack, cities, config))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
    }
}
