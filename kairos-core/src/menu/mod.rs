//! Menu navigation engine
//!
//! A small finite-state machine over a fixed set of screens. Button events
//! drive transitions or in-screen actions; two background producers feed the
//! live values the detail screens display.

pub mod cursor;
pub mod engine;
pub mod registry;

pub use cursor::{wrap_index, ScrollCursor};
pub use engine::{Effect, MenuEngine, Outcome};
pub use registry::{Action, Key, Registry, RegistryError, ScreenDef, ScreenId};

/// Abstract key events produced by the input adapter
///
/// Only the release edge of a press is dispatched. `Home` is wired outside
/// the screen registry, straight to `go_to` on the first top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Ok,
    Prev,
    Next,
    Home,
}

impl ButtonEvent {
    /// Map to a registry key; `Home` has no registry mapping
    pub fn as_key(self) -> Option<Key> {
        match self {
            ButtonEvent::Ok => Some(Key::Ok),
            ButtonEvent::Prev => Some(Key::Left),
            ButtonEvent::Next => Some(Key::Right),
            ButtonEvent::Home => None,
        }
    }
}
