pub mod config;
pub mod formatters;
