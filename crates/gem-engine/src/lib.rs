//! # gem-engine
//!
//! Adapter around the embedded SQL engine (libSQL, the C `SQLite` fork).
//!
//! This is the only crate that touches the engine's resource model:
//! - [`EngineRuntime::initialize`]: one-time, process-wide setup
//! - [`EngineRuntime::open`]: parse a byte buffer as a database image
//! - [`DatabaseHandle::execute`] / [`DatabaseHandle::execute_read_only`]
//! - [`DatabaseHandle::read_schema`]: user tables from engine metadata
//! - [`DatabaseHandle::close`]: release engine-side resources

pub mod error;
mod handle;
mod runtime;
pub mod split;

pub use error::EngineError;
pub use handle::DatabaseHandle;
pub use runtime::EngineRuntime;
