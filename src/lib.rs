pub mod core;
pub mod permissions;
pub mod comments;

// Ambient layers
pub mod config;
pub mod logging;

// Optional terminal output
pub mod cli;
