//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Snapshots always travel as whole values, so a reader can never observe a
//! half-updated record.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use kairos_core::clock::ClockSnapshot;
use kairos_core::menu::ButtonEvent;
use kairos_core::weather::WeatherSnapshot;
use kairos_display::Screen;

/// Channel capacity for button events from the input adapter
const INPUT_CHANNEL_SIZE: usize = 8;

/// Button events from the input adapter to the menu task
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, ButtonEvent, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Latest clock snapshot (replaced wholesale by the clock producer)
pub static CLOCK_SNAPSHOT: Signal<CriticalSectionRawMutex, ClockSnapshot> = Signal::new();

/// Latest weather snapshot (replaced wholesale by the weather producer)
pub static WEATHER_SNAPSHOT: Signal<CriticalSectionRawMutex, WeatherSnapshot> = Signal::new();

/// City index the weather producer must restart against
pub static CITY_SELECT: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Signal that a new frame is ready to be flushed to the LCD
pub static SCREEN_UPDATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Shared frame buffer between the menu task and the LCD task
pub static SCREEN_BUFFER: Mutex<CriticalSectionRawMutex, Screen> = Mutex::new(Screen::new());
