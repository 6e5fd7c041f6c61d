//! Embedded configuration
//!
//! The appliance carries its configuration compiled in (`kairos.toml` at the
//! crate root); there is no flash persistence. Parsing or validation errors
//! abort the boot.

mod toml;

pub use toml::{parse_config, ParseError};
