//! Apps and plugins gallery

pub mod catalogue;
pub mod notify;
pub mod url;
pub mod view;

pub use catalogue::{AppEntry, builtin_apps};
pub use notify::{ERROR_TOAST_TIMEOUT, Notifier, Toast, ToastLevel, ToastQueue};
pub use url::{PLUGIN_URL_PREFIX, PluginUrlError, TrustedResourceUrl, get_plugin_url};
pub use view::{ModalState, PLUGIN_MODAL_ID, PluginGallery};
