//! Common utilities and shared types for where2go.
//!
//! This crate provides foundational components used across all where2go crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Token generation**: Opaque session tokens via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use where2go_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let token = id_gen.generate_token();
//!     println!("Listening on port {} with token {}", config.server.port, token);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult, validation_messages};
pub use id::IdGenerator;
