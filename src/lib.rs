#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod channels;
pub mod cli;
pub mod config;
pub mod error;
pub mod links;

pub use config::Config;
pub use error::{BotError, ConfigError, TransportError};
