pub mod api;
pub mod config;
pub mod gallery;
pub mod plugins;
pub mod session;
pub mod shell;
