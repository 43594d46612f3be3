//! Core business logic for where2go.

pub mod services;

pub use services::*;
