//! Menu task - the single thread that owns the engine
//!
//! Receives button events and refresh ticks through one select loop, so the
//! menu state is never touched concurrently and needs no locking. Outward
//! effects travel through signals; frames travel through the shared screen
//! buffer.

use embassy_futures::select::{select, Either};
use embassy_time::Timer;
use log::{debug, info};

use kairos_core::cities::CitySelectionList;
use kairos_core::menu::{Effect, MenuEngine, Outcome, Registry, ScreenId};

use crate::channels::{
    CITY_SELECT, CLOCK_SNAPSHOT, INPUT_CHANNEL, SCREEN_BUFFER, SCREEN_UPDATE, WEATHER_SNAPSHOT,
};
use crate::tasks::tick::TICK_SIGNAL;

/// How long the power-on splash stays up
const WELCOME_MS: u64 = 2500;

/// Menu task - dispatches input and refresh into the engine
#[embassy_executor::task]
pub async fn menu_task(registry: Registry, cities: &'static CitySelectionList) {
    info!("Menu task started");

    let mut engine = MenuEngine::new(registry, cities);

    engine.render_welcome();
    present(&mut engine).await;
    Timer::after_millis(WELCOME_MS).await;

    engine.start();
    present(&mut engine).await;

    loop {
        match select(INPUT_CHANNEL.receive(), TICK_SIGNAL.wait()).await {
            Either::First(button) => {
                debug!("Button: {:?}", button);
                match button.as_key() {
                    Some(key) => match engine.handle_key(key) {
                        Outcome::Acted(Some(Effect::SelectCity(index))) => {
                            info!("City {} selected, restarting weather fetch", index);
                            CITY_SELECT.signal(index);
                        }
                        Outcome::Ignored => {
                            debug!("No action bound for {:?} on {:?}", key, engine.current());
                        }
                        _ => {}
                    },
                    // The home button bypasses the neighbor table entirely
                    None => engine.go_to(ScreenId::HomeClock),
                }
                present(&mut engine).await;
            }

            Either::Second(_now_ms) => {
                // Pick up whatever the producers published since last tick
                if let Some(snapshot) = CLOCK_SNAPSHOT.try_take() {
                    engine.update_clock(snapshot);
                }
                if let Some(snapshot) = WEATHER_SNAPSHOT.try_take() {
                    engine.update_weather(snapshot);
                }
                engine.refresh();
                present(&mut engine).await;
            }
        }
    }
}

/// Copy a dirty frame to the shared buffer and wake the LCD task
async fn present(engine: &mut MenuEngine<'_>) {
    if !engine.screen().is_dirty() {
        return;
    }
    {
        let mut buffer = SCREEN_BUFFER.lock().await;
        buffer.copy_from(engine.screen());
    }
    engine.mark_presented();
    SCREEN_UPDATE.signal(());
}
