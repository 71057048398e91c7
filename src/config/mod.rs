// src/config/mod.rs

//! Configuration loading, layering and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the resolved `ConsumerConfig` (`model.rs`).
//! - Load an optional config file from disk (`loader.rs`).
//! - Layer CLI flags, environment and file (`resolve.rs`).
//! - Validate the merged result (`validate.rs`).

pub mod loader;
pub mod model;
pub mod resolve;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConsumerConfig, RawConfigFile, RetrySection};
pub use resolve::{Overrides, QUEUE_URL_ENV, resolve, resolve_from_args};
