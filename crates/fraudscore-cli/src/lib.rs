//! fraudscore-cli: configuration, HTTP surface and command line for the
//! fraud scoring service.
pub mod cli;
pub mod config;
pub mod server;
