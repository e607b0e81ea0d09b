//! Build-event projection, stats persistence, and stats reading for assetstats.

pub mod document;
pub mod error;
pub mod exporter;
pub mod host;
pub mod projector;
pub mod record;
pub mod sink;

pub use document::StatsDocument;
pub use error::EngineError;
pub use exporter::StatsExporter;
pub use host::{BuildStats, HostEvent, ModuleFailure};
pub use projector::Projector;
pub use record::{BuildRecord, FileDescriptor};
pub use sink::Sink;
