//! Core types and utilities for the Life simulation engine.

pub mod types;
pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use events::{ChangeEvent, ChangeNotifier, SubscriptionId};
