//! Screen registry
//!
//! The fixed table of screens, their navigation wiring and their hooks.
//! Built once at startup and validated before the engine starts; the
//! `ScreenId` enum makes dangling neighbor references unrepresentable, so
//! validation only has to check table placement.

/// Screens of the menu graph
///
/// Discriminants index into the registry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenId {
    /// Top-level entry for the clock
    HomeClock = 0,
    /// Top-level entry for the API settings
    HomeSettings = 1,
    /// Top-level entry for the weather
    HomeWeather = 2,
    /// Date/time list: {date, time, Back}
    ClockDetail = 3,
    /// City list: selection list plus Back
    SettingsDetail = 4,
    /// Single-view weather report
    WeatherDetail = 5,
}

/// Number of screens in the registry
pub const SCREEN_COUNT: usize = 6;

impl ScreenId {
    /// All screens, in table order
    pub const ALL: [ScreenId; SCREEN_COUNT] = [
        ScreenId::HomeClock,
        ScreenId::HomeSettings,
        ScreenId::HomeWeather,
        ScreenId::ClockDetail,
        ScreenId::SettingsDetail,
        ScreenId::WeatherDetail,
    ];

    /// Index into the registry table
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Abstract keys the registry wires (the input adapter maps buttons here)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Ok = 0,
    Left = 1,
    Right = 2,
}

impl Key {
    /// All keys, in neighbor-table order
    pub const ALL: [Key; 3] = [Key::Ok, Key::Left, Key::Right];

    /// Index into a screen's neighbor/action tables
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Enum-tagged screen hooks, resolved through the engine's dispatch table
///
/// Replaces the raw callback storage a C screen table would use; every
/// behavior a screen can trigger is a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Move the scroll cursor one entry left and re-render
    ScrollPrev,
    /// Move the scroll cursor one entry right and re-render
    ScrollNext,
    /// OK on the date/time list: leave via Back, otherwise nothing
    ConfirmClockItem,
    /// OK on the city list: leave via Back or select the city under the
    /// cursor
    ConfirmCity,
    /// Seed the {date, time, Back} list and draw it with live values
    SeedClockList,
    /// Seed the city list and draw it
    SeedCityList,
    /// Draw the weather report with live values
    ShowWeather,
    /// Put the scroll cursor back on the first entry
    ResetCursor,
}

/// One screen of the menu graph (immutable)
#[derive(Debug, Clone, Copy)]
pub struct ScreenDef {
    pub id: ScreenId,
    /// Navigation target per key; the screen's own id marks an in-screen
    /// action
    pub neighbors: [ScreenId; 3],
    /// Display line templates: title plus up to three content lines.
    /// A blank second line selects the full-item view on entry.
    pub lines: [&'static str; 4],
    /// In-screen action per key, used when the neighbor is the screen itself
    pub on_key: [Option<Action>; 3],
    /// Hook run after entering this screen
    pub on_enter: Option<Action>,
    /// Hook run before leaving this screen through a key transition
    pub on_exit: Option<Action>,
}

/// Registry validation errors (startup-fatal configuration mistakes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// A screen definition sits at the wrong table index
    MisplacedScreen(ScreenId),
}

/// The validated, immutable screen table
#[derive(Debug, Clone)]
pub struct Registry {
    screens: [ScreenDef; SCREEN_COUNT],
}

impl Registry {
    /// Build and validate the standard screen table
    pub fn build() -> Result<Self, RegistryError> {
        Self::from_screens(standard_screens())
    }

    /// Build a registry from an explicit screen table
    ///
    /// Every definition must sit at the index of its own id. Neighbor
    /// targets are `ScreenId`s and therefore always exist.
    pub fn from_screens(screens: [ScreenDef; SCREEN_COUNT]) -> Result<Self, RegistryError> {
        for (index, def) in screens.iter().enumerate() {
            if def.id.index() != index {
                return Err(RegistryError::MisplacedScreen(def.id));
            }
        }
        Ok(Self { screens })
    }

    /// Look up a screen definition
    pub fn get(&self, id: ScreenId) -> &ScreenDef {
        &self.screens[id.index()]
    }
}

/// The production screen table
///
/// Top-level screens cycle among themselves on Left/Right and enter their
/// detail screen on Ok. Detail screens keep every key to themselves and act
/// through their hooks.
pub fn standard_screens() -> [ScreenDef; SCREEN_COUNT] {
    use Action::*;
    use ScreenId::*;

    [
        ScreenDef {
            id: HomeClock,
            //          ok           left         right
            neighbors: [ClockDetail, HomeWeather, HomeSettings],
            lines: ["MAIN MENU", "Date/Time", "", ""],
            on_key: [None, None, None],
            on_enter: None,
            on_exit: None,
        },
        ScreenDef {
            id: HomeSettings,
            neighbors: [SettingsDetail, HomeClock, HomeWeather],
            lines: ["MAIN MENU", "Settings", "", ""],
            on_key: [None, None, None],
            on_enter: None,
            on_exit: None,
        },
        ScreenDef {
            id: HomeWeather,
            neighbors: [WeatherDetail, HomeSettings, HomeClock],
            lines: ["MAIN MENU", "Weather", "", ""],
            on_key: [None, None, None],
            on_enter: None,
            on_exit: None,
        },
        ScreenDef {
            id: ClockDetail,
            neighbors: [ClockDetail, ClockDetail, ClockDetail],
            lines: ["DATE TIME", "", "", ""],
            on_key: [Some(ConfirmClockItem), Some(ScrollPrev), Some(ScrollNext)],
            on_enter: Some(SeedClockList),
            on_exit: Some(ResetCursor),
        },
        ScreenDef {
            id: SettingsDetail,
            neighbors: [SettingsDetail, SettingsDetail, SettingsDetail],
            lines: ["SETTINGS", "", "", ""],
            on_key: [Some(ConfirmCity), Some(ScrollPrev), Some(ScrollNext)],
            on_enter: Some(SeedCityList),
            on_exit: Some(ResetCursor),
        },
        ScreenDef {
            id: WeatherDetail,
            neighbors: [HomeWeather, WeatherDetail, WeatherDetail],
            lines: ["WEATHER", "", "", ""],
            on_key: [None, None, None],
            on_enter: Some(ShowWeather),
            on_exit: None,
        },
    ]
}
