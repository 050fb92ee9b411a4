pub mod catalog;
pub mod commands;
pub mod config;
pub mod consumer;
pub mod display;
pub mod logging;
pub mod protocol;
pub mod replay;
pub mod session;
pub mod transport;
