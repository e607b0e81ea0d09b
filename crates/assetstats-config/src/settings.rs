use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name used when `filename` is absent or empty.
pub const DEFAULT_OUTPUT_FILENAME: &str = "webpack-stats.json";

/// Chunk name whose modules are exported as named assets.
pub const DEFAULT_ASSETS_IDENTIFIER: &str = "exported_assets";

/// JSON indentation never exceeds this many spaces.
pub const MAX_INDENT: usize = 10;

/// The `assetstats.toml` settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub exporter: ExporterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Options of the stats exporter itself. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Name of the stats file inside `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Directory the stats file is written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Name of the chunk holding exported assets, also used as the
    /// top-level key of the asset mapping.
    #[serde(
        default,
        alias = "assetsIdentifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub assets_identifier: Option<String>,
    /// Include `startTime`/`endTime` in completed builds.
    #[serde(default, alias = "logTime")]
    pub log_time: bool,
    /// Spaces of JSON indentation; absent or zero writes compact JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,
}

/// The host build's output configuration, used to enrich file descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// URL prefix prepended to every emitted file name.
    #[serde(default, alias = "publicPath", skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    /// Directory the host emits files into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ExporterConfig {
    /// The configured file name, or [`DEFAULT_OUTPUT_FILENAME`].
    pub fn filename(&self) -> &str {
        non_empty(self.filename.as_deref()).unwrap_or(DEFAULT_OUTPUT_FILENAME)
    }

    /// The configured output directory, or the current directory.
    pub fn output_dir(&self) -> &Path {
        self.path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Full path of the stats file.
    pub fn output_file(&self) -> PathBuf {
        self.output_dir().join(self.filename())
    }

    /// The configured assets identifier, or [`DEFAULT_ASSETS_IDENTIFIER`].
    pub fn assets_identifier(&self) -> &str {
        non_empty(self.assets_identifier.as_deref()).unwrap_or(DEFAULT_ASSETS_IDENTIFIER)
    }

    /// Effective indentation width, clamped to [`MAX_INDENT`].
    /// `None` means compact output.
    pub fn indent_width(&self) -> Option<usize> {
        self.indent
            .filter(|&n| n > 0)
            .map(|n| n.min(MAX_INDENT))
    }
}

impl OutputConfig {
    /// The public-path base, if one is configured and non-empty.
    pub fn public_path(&self) -> Option<&str> {
        non_empty(self.public_path.as_deref())
    }

    /// The output directory, if one is configured and non-empty.
    pub fn path(&self) -> Option<&str> {
        non_empty(self.path.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl Settings {
    /// Read and parse an `assetstats.toml` from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Like [`Settings::from_path`], but a missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_path_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid assetstats.toml at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    fn write_settings(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("assetstats.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_apply_when_empty() {
        let config = ExporterConfig::default();
        assert_eq!(config.filename(), "webpack-stats.json");
        assert_eq!(config.assets_identifier(), "exported_assets");
        assert_eq!(config.output_file(), Path::new(".").join("webpack-stats.json"));
        assert!(!config.log_time);
        assert_eq!(config.indent_width(), None);
    }

    #[test]
    fn empty_strings_fall_back_to_defaults() {
        let config = ExporterConfig {
            filename: Some(String::new()),
            path: Some(PathBuf::new()),
            assets_identifier: Some(String::new()),
            ..ExporterConfig::default()
        };
        assert_eq!(config.filename(), DEFAULT_OUTPUT_FILENAME);
        assert_eq!(config.output_dir(), Path::new("."));
        assert_eq!(config.assets_identifier(), DEFAULT_ASSETS_IDENTIFIER);

        let output = OutputConfig {
            public_path: Some(String::new()),
            path: Some(String::new()),
        };
        assert_eq!(output.public_path(), None);
        assert_eq!(output.path(), None);
    }

    #[test]
    fn indent_is_clamped() {
        let mut config = ExporterConfig {
            indent: Some(0),
            ..ExporterConfig::default()
        };
        assert_eq!(config.indent_width(), None);
        config.indent = Some(4);
        assert_eq!(config.indent_width(), Some(4));
        config.indent = Some(40);
        assert_eq!(config.indent_width(), Some(MAX_INDENT));
    }

    #[test]
    fn parse_full_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_settings(
            tmp.path(),
            r#"
[exporter]
filename = "stats.json"
path = "build/meta"
assets_identifier = "static_assets"
log_time = true
indent = 2

[output]
public_path = "/static/"
path = "/srv/dist"
"#,
        );

        let settings = Settings::from_path(&path).unwrap();
        assert_eq!(
            settings.exporter.output_file(),
            Path::new("build/meta").join("stats.json")
        );
        assert_eq!(settings.exporter.assets_identifier(), "static_assets");
        assert!(settings.exporter.log_time);
        assert_eq!(settings.exporter.indent_width(), Some(2));
        assert_eq!(settings.output.public_path(), Some("/static/"));
        assert_eq!(settings.output.path(), Some("/srv/dist"));
    }

    #[test]
    fn camel_case_aliases_are_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_settings(
            tmp.path(),
            r#"
[exporter]
assetsIdentifier = "bundled"
logTime = true

[output]
publicPath = "https://cdn.example.com/"
"#,
        );

        let settings = Settings::from_path(&path).unwrap();
        assert_eq!(settings.exporter.assets_identifier(), "bundled");
        assert!(settings.exporter.log_time);
        assert_eq!(
            settings.output.public_path(),
            Some("https://cdn.example.com/")
        );
    }

    #[test]
    fn missing_sections_use_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_settings(tmp.path(), "");
        let settings = Settings::from_path(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn default_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let settings =
            Settings::from_path_or_default(&tmp.path().join("nonexistent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reject_invalid_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_settings(tmp.path(), "[exporter\nfilename = ");
        let err = Settings::from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn reject_wrong_types() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_settings(tmp.path(), "[exporter]\nindent = \"two\"\n");
        assert!(Settings::from_path(&path).is_err());
    }
}
