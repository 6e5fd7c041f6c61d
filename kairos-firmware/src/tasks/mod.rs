//! Embassy tasks
//!
//! One task per producer, one tick source, the serialized menu executor and
//! the LCD flusher. Wiring between them lives in `crate::channels`.

pub mod clock;
pub mod lcd;
pub mod menu;
pub mod tick;
pub mod weather;

pub use clock::clock_task;
pub use lcd::lcd_task;
pub use menu::menu_task;
pub use tick::tick_task;
pub use weather::weather_task;
