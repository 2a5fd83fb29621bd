//! Configuration module for Dishscout.

mod settings;

pub use settings::{GeneralSettings, ModelSettings, SearchSettings, Settings};
