//! Writer registry and built-in writer constructors
//!
//! A writer constructor turns a free-form option bag into a [`WriteSink`].
//! Outputs name their writer kind; the factory looks the constructor up here.
//!
//! The process-wide registry starts with `console` and `file`. Register
//! additional kinds with [`register_writer`] during start-up, before the
//! first logger is built.

pub mod console;
pub mod file;
pub mod rotating_file;

pub use console::{ConsoleSink, ConsoleTarget, ConsoleWriterOptions};
pub use file::{FileSink, FileWriterOptions};
pub use rotating_file::{RotatingFileSink, RotationPolicy};

pub use crate::config::WriterOptions;
use crate::core::error::{LoggerError, Result};
use crate::core::sink::WriteSink;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Capability mapping an option bag to a byte sink
pub type WriterConstructor =
    Arc<dyn Fn(&WriterOptions) -> Result<Box<dyn WriteSink>> + Send + Sync>;

/// Writer kind name → constructor. Names are case-insensitive.
#[derive(Clone, Default)]
pub struct WriterRegistry {
    writers: HashMap<String, WriterConstructor>,
}

impl WriterRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `console` and `file` writers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("console", console::console_writer);
        registry.register("file", file::file_writer);
        registry
    }

    /// Add or replace the constructor for `name`
    pub fn register<F>(&mut self, name: impl AsRef<str>, constructor: F)
    where
        F: Fn(&WriterOptions) -> Result<Box<dyn WriteSink>> + Send + Sync + 'static,
    {
        self.writers
            .insert(name.as_ref().to_lowercase(), Arc::new(constructor));
    }

    pub fn get(&self, name: &str) -> Option<WriterConstructor> {
        self.writers.get(&name.to_lowercase()).cloned()
    }

    /// Like [`get`](Self::get), failing with `UnsupportedWriter`
    pub fn lookup(&self, name: &str) -> Result<WriterConstructor> {
        self.get(name)
            .ok_or_else(|| LoggerError::unsupported_writer(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.writers.contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.writers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterRegistry")
            .field("writers", &self.names())
            .finish()
    }
}

fn global() -> &'static RwLock<WriterRegistry> {
    static REGISTRY: OnceLock<RwLock<WriterRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(WriterRegistry::with_builtins()))
}

/// Register a writer kind process-wide.
///
/// Call during start-up; loggers built earlier are unaffected.
///
/// ```
/// use tee_logger::{writers, IoSink, LoggerOption, OutputOption, WriteSink};
///
/// writers::register_writer("devnull", |_| {
///     Ok(Box::new(IoSink::new("devnull", std::io::sink())) as Box<dyn WriteSink>)
/// });
///
/// let logger = tee_logger::new(Some(
///     LoggerOption::new().with_output(OutputOption::new("devnull")),
/// )).unwrap();
/// logger.info("discarded");
/// ```
pub fn register_writer<F>(name: impl AsRef<str>, constructor: F)
where
    F: Fn(&WriterOptions) -> Result<Box<dyn WriteSink>> + Send + Sync + 'static,
{
    global().write().register(name, constructor);
}

/// Look up a constructor in the process-wide registry
pub fn lookup(name: &str) -> Result<WriterConstructor> {
    global().read().lookup(name)
}

pub fn is_registered(name: &str) -> bool {
    global().read().contains(name)
}

/// Decode an option bag into a writer's typed options.
///
/// Decoding is lenient: a bag that does not fit `T` yields `T::default()`
/// instead of an error. Missing keys take their defaults when `T` uses
/// `#[serde(default)]`.
pub fn decode_options<T>(options: &WriterOptions) -> T
where
    T: DeserializeOwned + Default,
{
    if options.is_empty() {
        return T::default();
    }
    serde_json::from_value(serde_json::Value::Object(options.clone())).unwrap_or_default()
}
