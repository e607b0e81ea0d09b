//! Turn host lifecycle events into [`BuildRecord`]s.

use assetstats_config::{ExporterConfig, OutputConfig};
use assetstats_util::ansi::strip_ansi;

use crate::host::{BuildStats, Chunk, ModuleFailure};
use crate::record::{BuildRecord, FileDescriptor, UNKNOWN_ERROR};

/// Stateless translator from host events to records.
#[derive(Debug, Clone)]
pub struct Projector {
    assets_identifier: String,
    log_time: bool,
    output: OutputConfig,
}

impl Projector {
    pub fn new(config: &ExporterConfig, output: &OutputConfig) -> Self {
        Self {
            assets_identifier: config.assets_identifier().to_owned(),
            log_time: config.log_time,
            output: output.clone(),
        }
    }

    pub fn on_compile_start(&self) -> BuildRecord {
        BuildRecord::Compiling
    }

    /// Project a single module failure. Unlike a failed build, this records
    /// the file the failing module was requested as.
    pub fn on_module_failure(&self, failure: &ModuleFailure) -> BuildRecord {
        let detail = &failure.error;
        BuildRecord::Error {
            error: error_kind(detail.name.as_deref()),
            message: detail
                .error
                .as_ref()
                .and_then(|cause| cause.code_frame.as_deref())
                .map(|frame| strip_ansi(frame).into_owned()),
            file: detail
                .module
                .as_ref()
                .and_then(|module| module.user_request.clone()),
        }
    }

    /// Project a finished build.
    ///
    /// A build with errors reports only the first one. Otherwise every chunk
    /// is classified: the assets chunk becomes the named-asset mapping, every
    /// other chunk is listed with its files. Unnamed chunks share the key
    /// `"null"`, so the last of them wins.
    pub fn on_build_complete(&self, stats: &BuildStats) -> BuildRecord {
        if let Some(first) = stats.compilation.errors.first() {
            return BuildRecord::Error {
                error: error_kind(first.name.as_deref()),
                message: first
                    .message
                    .as_deref()
                    .map(|message| strip_ansi(message).into_owned()),
                file: None,
            };
        }

        let mut chunks = Vec::new();
        let mut assets = Vec::new();
        for chunk in &stats.compilation.chunks {
            let key = chunk.key();
            if key == self.assets_identifier {
                assets.extend(self.named_assets(chunk));
            } else {
                let files: Vec<FileDescriptor> =
                    chunk.files.iter().map(|f| self.describe(f)).collect();
                chunks.push((key, files));
            }
        }

        let (start_time, end_time) = if self.log_time {
            (stats.start_time.clone(), stats.end_time.clone())
        } else {
            (None, None)
        };

        BuildRecord::Done {
            chunks,
            assets_identifier: self.assets_identifier.clone(),
            assets,
            start_time,
            end_time,
        }
    }

    /// Each module of the assets chunk names one asset: its raw request maps
    /// to the first file it produced. Further files of the same module are
    /// ignored, as is the chunk's own `<identifier>.js` wrapper.
    ///
    /// A module without a raw request is skipped rather than registered
    /// under a placeholder name such as `"undefined"`: no consumer could look
    /// it up, and several of them would overwrite each other.
    fn named_assets<'a>(
        &'a self,
        chunk: &'a Chunk,
    ) -> impl Iterator<Item = (String, FileDescriptor)> + 'a {
        let wrapper_suffix = format!("{}.js", self.assets_identifier);
        chunk.modules.iter().filter_map(move |module| {
            let file_name = module.first_asset()?;
            if file_name.ends_with(&wrapper_suffix) {
                return None;
            }
            let logical_name = module.logical_name()?;
            Some((logical_name, self.describe(file_name)))
        })
    }

    fn describe(&self, file_name: &str) -> FileDescriptor {
        FileDescriptor::new(file_name, &self.output)
    }
}

fn error_kind(name: Option<&str>) -> String {
    name.filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_ERROR)
        .to_owned()
}
