//! Terminal front end: shell, gallery and case list on ratatui

pub mod app;
pub mod color;
pub mod runtime;
pub mod theme;
pub mod view;

pub use runtime::{TuiOptions, launch};
