//! Button input adapter
//!
//! Decodes the four navigation buttons into abstract `ButtonEvent`s. Only
//! the release edge of a press is dispatched; holding a button produces no
//! repeats.

use embassy_futures::select::{select4, Either4};
use embassy_time::Timer;
use esp_hal::gpio::Input;
use log::{debug, info};

use kairos_core::menu::ButtonEvent;

use crate::channels::INPUT_CHANNEL;

const DEBOUNCE_MS: u64 = 30;

/// The four navigation buttons (active low)
pub struct ButtonPins {
    pub ok: Input<'static>,
    pub prev: Input<'static>,
    pub next: Input<'static>,
    pub home: Input<'static>,
}

/// Button task - turns GPIO edges into menu events
#[embassy_executor::task]
pub async fn button_task(mut pins: ButtonPins) {
    info!("Button task started");

    loop {
        let event = match select4(
            released(&mut pins.ok),
            released(&mut pins.prev),
            released(&mut pins.next),
            released(&mut pins.home),
        )
        .await
        {
            Either4::First(()) => ButtonEvent::Ok,
            Either4::Second(()) => ButtonEvent::Prev,
            Either4::Third(()) => ButtonEvent::Next,
            Either4::Fourth(()) => ButtonEvent::Home,
        };

        debug!("Button released: {:?}", event);
        INPUT_CHANNEL.send(event).await;
    }
}

/// Complete one press-and-release cycle on `pin`, with debounce on both
/// edges
async fn released(pin: &mut Input<'static>) {
    pin.wait_for_falling_edge().await;
    Timer::after_millis(DEBOUNCE_MS).await;
    pin.wait_for_rising_edge().await;
    Timer::after_millis(DEBOUNCE_MS).await;
}
