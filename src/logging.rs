//! Warning sinks and tracing setup.
//!
//! Validation problems are reported through a [`WarnSink`] injected into the
//! configuration context. The default sink forwards to `tracing`; the binary
//! installs a subscriber via [`init_tracing`].

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Receives warnings produced while validating a configuration.
pub trait WarnSink: Send + Sync {
    fn warn(&self, message: &str);
}

impl<F> WarnSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn warn(&self, message: &str) {
        self(message)
    }
}

/// Default sink: emits each warning as a `tracing` WARN event.
#[derive(Debug, Clone, Default)]
pub struct TracingWarnSink {
    /// Logger name attached to every event.
    name: Option<String>,
}

impl TracingWarnSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logger name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl WarnSink for TracingWarnSink {
    fn warn(&self, message: &str) {
        if let Some(ref name) = self.name {
            tracing::warn!(logger = %name, "{}", message);
        } else {
            tracing::warn!("{}", message);
        }
    }
}

/// Sink that keeps every warning in memory.
///
/// Clones share the same buffer, so one handle can be given to the
/// configuration while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectingWarnSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingWarnSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl WarnSink for CollectingWarnSink {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Where the binary writes its log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Off,
    Stdout,
    Stderr,
    /// Append to a file.
    File(PathBuf),
}

impl LogDestination {
    /// Parse `0`/`off`, `1`/`stdout`, `2`/`stderr`, or a filename.
    pub fn parse(s: &str) -> Self {
        match s {
            "0" | "off" => LogDestination::Off,
            "1" | "stdout" => LogDestination::Stdout,
            "2" | "stderr" => LogDestination::Stderr,
            filename => LogDestination::File(PathBuf::from(filename)),
        }
    }
}

/// Install the global `tracing` subscriber.
pub fn init_tracing(destination: &LogDestination, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    match destination {
        LogDestination::Off => {}
        LogDestination::Stdout => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogDestination::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogDestination::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
