//! Core library components.

pub mod config;
pub mod constants;
pub mod envfile;
pub mod generate;
pub mod passwd;
pub mod secrets;
pub mod users;
