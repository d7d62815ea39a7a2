pub mod analyzer;
pub mod boundary;
pub mod config;
pub mod domain;
pub mod error;
pub mod gitlab;
pub mod release;
pub mod ui;

pub use error::{ReleaseError, Result};
