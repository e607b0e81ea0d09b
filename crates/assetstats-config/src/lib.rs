//! Parse and validate `assetstats.toml`.

pub mod settings;

pub use settings::{ExporterConfig, OutputConfig, Settings, SettingsError};
