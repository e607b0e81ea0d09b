//! The exporter core: one projector feeding one sink.

use std::path::Path;

use assetstats_config::Settings;
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::host::{BuildStats, HostEvent, ModuleFailure};
use crate::projector::Projector;
use crate::sink::Sink;

/// Writes the stats file as a host build progresses.
///
/// State lives in the instance; build one exporter per build process.
#[derive(Debug)]
pub struct StatsExporter {
    projector: Projector,
    sink: Sink,
}

impl StatsExporter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            projector: Projector::new(&settings.exporter, &settings.output),
            sink: Sink::new(&settings.exporter, &settings.output),
        }
    }

    /// Path of the stats file this exporter writes.
    pub fn target(&self) -> &Path {
        self.sink.target()
    }

    /// The document as last written.
    pub fn state(&self) -> &Map<String, Value> {
        self.sink.state()
    }

    /// Handler for the "compilation started" hook.
    ///
    /// # Errors
    /// Returns an error if the stats file cannot be written.
    pub fn compile_started(&mut self) -> Result<(), EngineError> {
        self.sink.write(self.projector.on_compile_start())
    }

    /// Handler for the "module failed" hook.
    ///
    /// # Errors
    /// Returns an error if the stats file cannot be written.
    pub fn module_failed(&mut self, failure: &ModuleFailure) -> Result<(), EngineError> {
        self.sink.write(self.projector.on_module_failure(failure))
    }

    /// Handler for the "build finished" hook.
    ///
    /// # Errors
    /// Returns an error if the stats file cannot be written.
    pub fn build_finished(&mut self, stats: &BuildStats) -> Result<(), EngineError> {
        self.sink.write(self.projector.on_build_complete(stats))
    }

    /// Dispatch one host event to its handler.
    ///
    /// # Errors
    /// Returns an error if the stats file cannot be written.
    pub fn handle(&mut self, event: &HostEvent) -> Result<(), EngineError> {
        match event {
            HostEvent::Compile => self.compile_started(),
            HostEvent::FailedModule(failure) => self.module_failed(failure),
            HostEvent::Done(stats) => self.build_finished(stats),
        }
    }

    /// Subscribe to a host pipeline and handle its events in order.
    ///
    /// Returns the number of writes performed.
    ///
    /// # Errors
    /// Stops at, and returns, the first write failure.
    pub fn attach<I>(&mut self, pipeline: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = HostEvent>,
    {
        let mut writes = 0;
        for event in pipeline {
            self.handle(&event)?;
            writes += 1;
        }
        Ok(writes)
    }
}
