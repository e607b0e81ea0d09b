//! Read a persisted stats file back, for tooling that needs to resolve
//! logical asset names without running the build.

use std::path::{Path, PathBuf};

use assetstats_config::Settings;
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::record::FileDescriptor;

/// A stats file as written by [`crate::Sink`].
#[derive(Debug, Clone)]
pub struct StatsDocument {
    path: PathBuf,
    assets_identifier: String,
    fields: Map<String, Value>,
}

/// The error a failed build left in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedError<'a> {
    pub kind: &'a str,
    pub file: Option<&'a str>,
    pub message: Option<&'a str>,
}

impl StatsDocument {
    /// Read the stats file at `path`, whose named assets live under
    /// `assets_identifier`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not JSON, or its top
    /// level is not an object.
    pub fn from_path(path: &Path, assets_identifier: &str) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| EngineError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let Value::Object(fields) = value else {
            return Err(EngineError::Parse {
                path: path.display().to_string(),
                message: "top level is not an object".to_owned(),
            });
        };
        Ok(Self {
            path: path.to_path_buf(),
            assets_identifier: assets_identifier.to_owned(),
            fields,
        })
    }

    /// Read the stats file the given settings would produce.
    ///
    /// # Errors
    /// Same as [`StatsDocument::from_path`].
    pub fn from_settings(settings: &Settings) -> Result<Self, EngineError> {
        Self::from_path(
            &settings.exporter.output_file(),
            settings.exporter.assets_identifier(),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `compiling`, `error` or `done`.
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    pub fn public_path(&self) -> Option<&str> {
        self.str_field("publicPath")
    }

    /// The recorded error, if the latest status is `error`.
    pub fn error(&self) -> Option<RecordedError<'_>> {
        if self.status() != Some(crate::record::STATUS_ERROR) {
            return None;
        }
        Some(RecordedError {
            kind: self
                .str_field("error")
                .unwrap_or(crate::record::UNKNOWN_ERROR),
            file: self.str_field("file"),
            message: self.str_field("message"),
        })
    }

    /// Look up a named asset.
    pub fn asset(&self, name: &str) -> Option<FileDescriptor> {
        let entry = self
            .fields
            .get(&self.assets_identifier)
            .and_then(|assets| assets.get(name))?;
        serde_json::from_value(entry.clone()).ok()
    }

    /// Names of all exported assets, in document order.
    pub fn asset_names(&self) -> Vec<&str> {
        self.fields
            .get(&self.assets_identifier)
            .and_then(Value::as_object)
            .map(|assets| assets.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Files of an ordinary chunk.
    pub fn chunk(&self, name: &str) -> Option<Vec<FileDescriptor>> {
        let entry = self
            .fields
            .get("chunks")
            .and_then(|chunks| chunks.get(name))?;
        serde_json::from_value(entry.clone()).ok()
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}
