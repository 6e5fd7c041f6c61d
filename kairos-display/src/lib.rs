//! Display abstraction for the Kairos weather clock
//!
//! This crate provides:
//! - `DisplayBackend` trait for character LCD hardware (HD44780 and friends)
//! - `Screen` buffer type the menu engine renders into
//!
//! # Architecture
//!
//! The menu engine builds each frame into a `Screen` (a 20x4 character
//! grid). A dedicated LCD task diffs nothing and flushes the whole buffer
//! through a `DisplayBackend` implementation, so the engine never touches
//! hardware and stays host-testable.

#![no_std]

pub mod backend;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use screen::{centered_col, Screen, SCREEN_COLS, SCREEN_ROWS};
