pub mod attachment;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod slack;
pub mod template;

pub use error::{Error, Result};
