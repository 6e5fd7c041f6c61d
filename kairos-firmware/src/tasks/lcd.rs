//! LCD flush task
//!
//! Waits for frame updates from the menu task and rewrites the panel. The
//! buffer carries fully positioned rows, so flushing is a clear plus one
//! positioned write per non-blank row.

use esp_hal::i2c::master::I2c;
use esp_hal::Blocking;
use log::{info, warn};

use kairos_display::{DisplayBackend, DisplayError, Screen};

use crate::channels::{SCREEN_BUFFER, SCREEN_UPDATE};
use crate::hd44780::Hd44780;

/// LCD task - flushes frames to the panel
#[embassy_executor::task]
pub async fn lcd_task(mut display: Hd44780<I2c<'static, Blocking>>) {
    info!("LCD task started");

    loop {
        SCREEN_UPDATE.wait().await;

        // Copy the frame out so the menu task is not blocked on I2C writes
        let frame = {
            let buffer = SCREEN_BUFFER.lock().await;
            buffer.clone()
        };

        if let Err(e) = flush(&mut display, &frame) {
            warn!("LCD flush failed: {:?}", e);
        }
    }
}

/// Rewrite the whole frame
fn flush(display: &mut impl DisplayBackend, frame: &Screen) -> Result<(), DisplayError> {
    display.clear()?;
    for (row, line) in frame.lines().enumerate() {
        let text = line.trim_end();
        if text.is_empty() {
            continue;
        }
        let col = (text.len() - text.trim_start().len()) as u8;
        display.write_line(text.trim_start(), col, row as u8)?;
    }
    Ok(())
}
