//! Configuration: environment-driven settings plus the constants that
//! define roles, permit defaults and field limits.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
