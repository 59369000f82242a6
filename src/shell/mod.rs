//! Shell screen: theme, side navigation, device detection and server
//! liveness.

pub mod controller;
pub mod device;
pub mod links;
pub mod navigation;
pub mod theme;

pub use controller::{Shell, ShellOptions};
pub use device::{DeviceClass, default_user_agent};
pub use links::{Link, LinkSet};
pub use navigation::{NavigationService, Route, ScreenRouter};
pub use theme::{DocumentRoot, RootElement, THEME_ATTRIBUTE, THEME_PREFERENCE_KEY, ThemeMode};
