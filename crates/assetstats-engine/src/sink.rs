//! Accumulate records and persist them to the stats file.

use std::path::{Path, PathBuf};

use assetstats_config::{ExporterConfig, OutputConfig};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::record::BuildRecord;

/// Owns the accumulated stats document and the file it is written to.
///
/// Every write merges the record's top-level keys over the current state
/// and rewrites the whole file. Keys are never removed, and a key that is
/// overwritten keeps its original position in the document.
#[derive(Debug)]
pub struct Sink {
    target: PathBuf,
    indent: Option<usize>,
    public_path: Option<String>,
    state: Map<String, Value>,
}

impl Sink {
    pub fn new(config: &ExporterConfig, output: &OutputConfig) -> Self {
        Self {
            target: config.output_file(),
            indent: config.indent_width(),
            public_path: output.public_path().map(str::to_owned),
            state: Map::new(),
        }
    }

    /// Path of the stats file.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The accumulated document.
    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Merge `record` into the accumulated state and rewrite the stats file.
    ///
    /// # Errors
    /// Returns an error if the record cannot be serialized, or if the target
    /// directory cannot be created or the file cannot be written. In the
    /// latter case the state is merged anyway.
    pub fn write(&mut self, record: BuildRecord) -> Result<(), EngineError> {
        let fields = record
            .into_fields()
            .map_err(|source| EngineError::Serialize {
                path: self.target.display().to_string(),
                source,
            })?;
        self.write_fields(fields)
    }

    /// Merge top-level keys into the accumulated state and rewrite the stats
    /// file. A configured public path is always stamped on.
    fn write_fields(&mut self, mut fields: Map<String, Value>) -> Result<(), EngineError> {
        if let Some(public_path) = &self.public_path {
            fields.insert("publicPath".to_owned(), Value::String(public_path.clone()));
        }
        for (key, value) in fields {
            self.state.insert(key, value);
        }

        let body = self.render()?;
        assetstats_util::fs::write_file(&self.target, &body)?;
        Ok(())
    }

    /// Serialize the accumulated state with the configured indentation.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn render(&self) -> Result<Vec<u8>, EngineError> {
        let mut body = Vec::new();
        let result = match self.indent {
            Some(width) => {
                let indent = vec![b' '; width];
                let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
                let mut serializer = serde_json::Serializer::with_formatter(&mut body, formatter);
                self.state.serialize(&mut serializer)
            }
            None => serde_json::to_writer(&mut body, &self.state),
        };
        result.map_err(|source| EngineError::Serialize {
            path: self.target.display().to_string(),
            source,
        })?;
        Ok(body)
    }
}
