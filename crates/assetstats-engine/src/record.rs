//! The flat records projected from lifecycle events.

use assetstats_config::OutputConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status string of a compilation in progress.
pub const STATUS_COMPILING: &str = "compiling";
/// Status string of a failed compilation.
pub const STATUS_ERROR: &str = "error";
/// Status string of a successful compilation.
pub const STATUS_DONE: &str = "done";

/// Error kind used when the host gives none.
pub const UNKNOWN_ERROR: &str = "unknown-error";

/// One emitted file, as seen by consumers of the stats file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Emitted file name.
    pub name: String,
    /// Public URL prefix followed by the file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    /// Output directory joined with the file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FileDescriptor {
    /// Describe `file_name` relative to the host's output configuration.
    ///
    /// `public_path` and `path` are only set when the host configures the
    /// matching base.
    pub fn new(file_name: &str, output: &OutputConfig) -> Self {
        Self {
            name: file_name.to_owned(),
            public_path: output.public_path().map(|base| format!("{base}{file_name}")),
            path: output
                .path()
                .map(|dir| assetstats_util::fs::join_lexical(dir, file_name)),
        }
    }

    /// The most useful location for a consumer: the public URL, then the
    /// filesystem path, then the bare name.
    pub fn location(&self) -> &str {
        self.public_path
            .as_deref()
            .or(self.path.as_deref())
            .unwrap_or(&self.name)
    }
}

/// What one lifecycle event contributes to the stats file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildRecord {
    Compiling,
    Error {
        /// Kind of failure, [`UNKNOWN_ERROR`] when the host gave none.
        error: String,
        message: Option<String>,
        file: Option<String>,
    },
    Done {
        /// Ordinary chunks in host order. A repeated name replaces the
        /// earlier entry.
        chunks: Vec<(String, Vec<FileDescriptor>)>,
        /// Top-level key the named assets are stored under.
        assets_identifier: String,
        /// Logical asset name to emitted file, in host order.
        assets: Vec<(String, FileDescriptor)>,
        /// Host timestamps, passed through untouched.
        start_time: Option<Value>,
        end_time: Option<Value>,
    },
}

impl BuildRecord {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Compiling => STATUS_COMPILING,
            Self::Error { .. } => STATUS_ERROR,
            Self::Done { .. } => STATUS_DONE,
        }
    }

    /// Flatten into the top-level keys written to the stats file.
    ///
    /// # Errors
    /// Returns an error if a file descriptor cannot be serialized.
    pub fn into_fields(self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = Map::new();
        fields.insert("status".to_owned(), Value::from(self.status()));

        match self {
            Self::Compiling => {}
            Self::Error {
                error,
                message,
                file,
            } => {
                fields.insert("error".to_owned(), Value::String(error));
                if let Some(file) = file {
                    fields.insert("file".to_owned(), Value::String(file));
                }
                if let Some(message) = message {
                    fields.insert("message".to_owned(), Value::String(message));
                }
            }
            Self::Done {
                chunks,
                assets_identifier,
                assets,
                start_time,
                end_time,
            } => {
                let mut chunk_map = Map::new();
                for (name, files) in chunks {
                    chunk_map.insert(name, serde_json::to_value(files)?);
                }
                let mut asset_map = Map::new();
                for (name, file) in assets {
                    asset_map.insert(name, serde_json::to_value(file)?);
                }

                fields.insert("chunks".to_owned(), Value::Object(chunk_map));
                fields.insert(assets_identifier, Value::Object(asset_map));
                if let Some(start) = start_time {
                    fields.insert("startTime".to_owned(), start);
                }
                if let Some(end) = end_time {
                    fields.insert("endTime".to_owned(), end);
                }
            }
        }

        Ok(fields)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output(public_path: Option<&str>, path: Option<&str>) -> OutputConfig {
        OutputConfig {
            public_path: public_path.map(str::to_owned),
            path: path.map(str::to_owned),
        }
    }

    #[test]
    fn descriptor_with_no_bases_is_name_only() {
        let file = FileDescriptor::new("main.js", &output(None, None));
        assert_eq!(file.public_path, None);
        assert_eq!(file.path, None);
        assert_eq!(serde_json::to_value(&file).unwrap(), json!({"name": "main.js"}));
    }

    #[test]
    fn descriptor_with_both_bases() {
        let file = FileDescriptor::new("main.js", &output(Some("/static/"), Some("/dist")));
        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({"name": "main.js", "publicPath": "/static/main.js", "path": "/dist/main.js"})
        );
    }

    #[test]
    fn public_path_is_concatenated_verbatim() {
        let file = FileDescriptor::new("main.js", &output(Some("https://cdn.example.com/v2"), None));
        assert_eq!(
            file.public_path.as_deref(),
            Some("https://cdn.example.com/v2main.js")
        );
    }

    #[test]
    fn location_prefers_public_path() {
        let both = FileDescriptor::new("a.png", &output(Some("/s/"), Some("/dist")));
        assert_eq!(both.location(), "/s/a.png");
        let path_only = FileDescriptor::new("a.png", &output(None, Some("/dist")));
        assert_eq!(path_only.location(), "/dist/a.png");
        let bare = FileDescriptor::new("a.png", &output(None, None));
        assert_eq!(bare.location(), "a.png");
    }

    #[test]
    fn compiling_fields() {
        let fields = BuildRecord::Compiling.into_fields().unwrap();
        assert_eq!(Value::Object(fields), json!({"status": "compiling"}));
    }

    #[test]
    fn error_fields_put_file_before_message() {
        let record = BuildRecord::Error {
            error: "ModuleNotFoundError".to_owned(),
            message: Some("bad".to_owned()),
            file: Some("./foo.js".to_owned()),
        };
        let fields = record.into_fields().unwrap();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["status", "error", "file", "message"]);
    }

    #[test]
    fn error_fields_omit_absent_values() {
        let record = BuildRecord::Error {
            error: UNKNOWN_ERROR.to_owned(),
            message: None,
            file: None,
        };
        assert_eq!(
            Value::Object(record.into_fields().unwrap()),
            json!({"status": "error", "error": "unknown-error"})
        );
    }

    #[test]
    fn done_fields_use_assets_identifier_key() {
        let record = BuildRecord::Done {
            chunks: vec![(
                "main".to_owned(),
                vec![FileDescriptor::new("main.js", &output(None, None))],
            )],
            assets_identifier: "static_assets".to_owned(),
            assets: Vec::new(),
            start_time: Some(json!(1)),
            end_time: Some(json!(2)),
        };
        let fields = record.into_fields().unwrap();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["status", "chunks", "static_assets", "startTime", "endTime"]
        );
        assert_eq!(fields.get("static_assets"), Some(&json!({})));
    }

    #[test]
    fn repeated_chunk_name_keeps_last_files() {
        let record = BuildRecord::Done {
            chunks: vec![
                ("main".to_owned(), vec![FileDescriptor::new("a.js", &output(None, None))]),
                ("main".to_owned(), vec![FileDescriptor::new("b.js", &output(None, None))]),
            ],
            assets_identifier: "exported_assets".to_owned(),
            assets: Vec::new(),
            start_time: None,
            end_time: None,
        };
        let fields = record.into_fields().unwrap();
        assert_eq!(
            fields.get("chunks"),
            Some(&json!({"main": [{"name": "b.js"}]}))
        );
    }

    #[test]
    fn descriptor_keys_serialize_in_declared_order() {
        let file = FileDescriptor::new("main.js", &output(Some("/static/"), Some("/dist")));
        assert_eq!(
            serde_json::to_string(&file).unwrap(),
            r#"{"name":"main.js","publicPath":"/static/main.js","path":"/dist/main.js"}"#
        );
    }

    #[test]
    fn timestamps_pass_through_unchanged() {
        let record = BuildRecord::Done {
            chunks: Vec::new(),
            assets_identifier: "exported_assets".to_owned(),
            assets: Vec::new(),
            start_time: Some(json!(1.5)),
            end_time: Some(json!("2024-01-01T00:00:00Z")),
        };
        let fields = record.into_fields().unwrap();
        assert_eq!(fields.get("startTime"), Some(&json!(1.5)));
        assert_eq!(fields.get("endTime"), Some(&json!("2024-01-01T00:00:00Z")));
    }
}
