//! The host build pipeline's side of the contract: lifecycle events and the
//! data they carry.
//!
//! Field names follow the host's JSON (camelCase) so events can be replayed
//! from a JSON-lines stream. Every field the host may leave out is optional
//! and simply ends up absent in the stats output.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One lifecycle notification from the host pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HostEvent {
    /// A compilation has started.
    Compile,
    /// A single module failed to build.
    FailedModule(ModuleFailure),
    /// The build finished, successfully or not.
    Done(BuildStats),
}

/// Payload of the "module failed" hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleFailure {
    #[serde(default)]
    pub error: FailureDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetail {
    /// Kind of failure, e.g. `ModuleNotFoundError`.
    #[serde(default)]
    pub name: Option<String>,
    /// The module that failed, when known.
    #[serde(default)]
    pub module: Option<FailedModule>,
    /// The underlying diagnostic, when one was produced.
    #[serde(default)]
    pub error: Option<FailureCause>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedModule {
    /// The path the module was originally requested as.
    #[serde(default)]
    pub user_request: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureCause {
    /// Formatted source excerpt, possibly containing terminal escapes.
    #[serde(default)]
    pub code_frame: Option<String>,
}

/// Payload of the "build finished" hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    #[serde(default)]
    pub compilation: Compilation,
    /// Copied to the stats file as given, whatever its JSON type.
    #[serde(default)]
    pub start_time: Option<serde_json::Value>,
    #[serde(default)]
    pub end_time: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compilation {
    #[serde(default)]
    pub errors: Vec<CompilationError>,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationError {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A logical group of emitted files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Usually a string; `None` for chunks the host left unnamed.
    #[serde(default)]
    pub name: Option<serde_json::Value>,
    /// Emitted file names, in emission order.
    #[serde(default)]
    pub files: Vec<String>,
    /// Constituent modules. Only consulted for the assets chunk.
    #[serde(default)]
    pub modules: Vec<ChunkModule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkModule {
    /// The identifier the module was requested with, e.g. `logo`.
    #[serde(default)]
    pub raw_request: Option<serde_json::Value>,
    /// Files this module produced, keyed by file name in production order.
    #[serde(default)]
    pub assets: serde_json::Map<String, serde_json::Value>,
}

impl Chunk {
    /// The key this chunk is listed under. Unnamed chunks share `"null"`.
    pub fn key(&self) -> String {
        self.name.as_ref().map_or_else(|| "null".to_owned(), key_string)
    }
}

impl ChunkModule {
    /// The logical asset name, if the host gave a request.
    pub fn logical_name(&self) -> Option<String> {
        self.raw_request.as_ref().map(key_string)
    }

    /// The first file this module produced, if any.
    pub fn first_asset(&self) -> Option<&str> {
        self.assets.keys().next().map(String::as_str)
    }
}

/// Render a host value as an object key: strings as-is, anything else as
/// its JSON text (`7`, `true`, `null`).
pub fn key_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Iterator over host events stored one JSON object per line.
///
/// Blank lines are skipped. Lines are numbered from 1 in errors.
pub struct EventReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<HostEvent, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            self.line += 1;
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) if self.buf.trim().is_empty() => continue,
                Ok(_) => {
                    let line = self.line;
                    return Some(
                        serde_json::from_str(self.buf.trim())
                            .map_err(|source| EngineError::Event { line, source }),
                    );
                }
                Err(source) => {
                    return Some(Err(EngineError::Read {
                        path: format!("<events line {}>", self.line),
                        source,
                    }))
                }
            }
        }
    }
}
