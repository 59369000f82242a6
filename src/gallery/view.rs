use super::catalogue::{AppEntry, builtin_apps};
use super::notify::{ERROR_TOAST_TIMEOUT, Notifier};
use super::url::{PluginUrlError, TrustedResourceUrl, get_plugin_url};
use crate::api::{ApiError, PluginDescriptor};
use crate::session::SessionGateway;
use log::{debug, info};

/// Container id hosting the plugin modal
pub const PLUGIN_MODAL_ID: &str = "pluginModal";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Hidden,
    Shown,
}

/// Apps and plugins screen.
///
/// Holds the static apps catalogue, the plugins reported by the server and
/// the plugin currently open in the modal.
#[derive(Debug, Default)]
pub struct PluginGallery {
    apps: Vec<AppEntry>,
    plugins: Vec<PluginDescriptor>,
    selected_plugin: Option<PluginDescriptor>,
    selected_url: Option<TrustedResourceUrl>,
    modal: ModalState,
    plugins_loaded: bool,
}

impl PluginGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the apps catalogue and ask the server for plugins.
    /// A failed request becomes an error notification.
    pub async fn startup(&mut self, gateway: &SessionGateway, notifier: &mut dyn Notifier) {
        self.load_apps();
        let result = gateway.load_plugins().await;
        self.apply_plugins(result, notifier);
    }

    pub fn load_apps(&mut self) {
        self.apps = builtin_apps();
    }

    /// Take the outcome of a plugin list request
    pub fn apply_plugins(&mut self, result: Result<Vec<PluginDescriptor>, ApiError>, notifier: &mut dyn Notifier) {
        match result {
            Ok(plugins) => {
                info!("Loaded {} plugins", plugins.len());
                self.plugins = plugins;
                self.plugins_loaded = true;
            }
            Err(e) => {
                notifier.error(&format!("Error loading plugins: {}", e), "Error", ERROR_TOAST_TIMEOUT);
            }
        }
    }

    /// Select a plugin and show it in the modal.
    ///
    /// A plugin whose UI path is not a same-origin relative path is never
    /// opened; the user gets an error notification instead.
    pub fn open_plugin(&mut self, plugin: &PluginDescriptor, notifier: &mut dyn Notifier) -> Option<&TrustedResourceUrl> {
        let url = match get_plugin_url(plugin) {
            Ok(url) => url,
            Err(e) => {
                notifier.error(&format!("Cannot open plugin {}: {}", plugin.name, e), "Error", ERROR_TOAST_TIMEOUT);
                return None;
            }
        };

        info!("Opening plugin UI: {}", plugin.ui_path);
        self.selected_plugin = Some(plugin.clone());
        self.selected_url = Some(url);
        self.modal = ModalState::Shown;
        self.selected_url.as_ref()
    }

    /// Handler for the modal's own dismissal
    pub fn on_modal_hidden(&mut self) {
        debug!("Plugin modal hidden");
        self.modal = ModalState::Hidden;
        self.clear_selection();
    }

    /// Programmatic dismissal
    pub fn clear_selected_plugin(&mut self) {
        self.modal = ModalState::Hidden;
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        self.selected_plugin = None;
        self.selected_url = None;
    }

    pub fn get_plugin_url(&self, plugin: &PluginDescriptor) -> Result<TrustedResourceUrl, PluginUrlError> {
        get_plugin_url(plugin)
    }

    pub fn apps(&self) -> &[AppEntry] {
        &self.apps
    }

    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    pub fn plugins_loaded(&self) -> bool {
        self.plugins_loaded
    }

    pub fn selected_plugin(&self) -> Option<&PluginDescriptor> {
        self.selected_plugin.as_ref()
    }

    pub fn selected_url(&self) -> Option<&TrustedResourceUrl> {
        self.selected_url.as_ref()
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal == ModalState::Shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::notify::{ToastLevel, ToastQueue};

    #[test]
    fn test_open_and_close_plugin() {
        let mut gallery = PluginGallery::new();
        let mut toasts = ToastQueue::new();
        let plugin = PluginDescriptor::new("Rates", "plugins/rates/index.html");

        let url = gallery.open_plugin(&plugin, &mut toasts).cloned().unwrap();
        assert_eq!(url.as_str(), "/plugins/rates/index.html");
        assert_eq!(gallery.selected_plugin(), Some(&plugin));
        assert!(gallery.is_modal_open());

        gallery.on_modal_hidden();
        assert!(gallery.selected_plugin().is_none());
        assert!(gallery.selected_url().is_none());
        assert!(!gallery.is_modal_open());
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_reopen_never_shows_stale_plugin() {
        let mut gallery = PluginGallery::new();
        let mut toasts = ToastQueue::new();
        let first = PluginDescriptor::new("First", "plugins/first/ui.html");
        let second = PluginDescriptor::new("Second", "plugins/second/ui.html");

        gallery.open_plugin(&first, &mut toasts);
        gallery.clear_selected_plugin();
        gallery.open_plugin(&second, &mut toasts);

        assert_eq!(gallery.selected_plugin().unwrap().name, "Second");
        assert_eq!(gallery.selected_url().unwrap().as_str(), "/plugins/second/ui.html");
    }

    #[test]
    fn test_untrusted_path_is_not_opened() {
        let mut gallery = PluginGallery::new();
        let mut toasts = ToastQueue::new();
        let plugin = PluginDescriptor::new("Evil", "https://evil.example/ui");

        assert!(gallery.open_plugin(&plugin, &mut toasts).is_none());
        assert!(gallery.selected_plugin().is_none());
        assert!(!gallery.is_modal_open());
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.all()[0].level, ToastLevel::Error);
    }

    #[test]
    fn test_failed_plugin_load_keeps_apps() {
        let mut gallery = PluginGallery::new();
        let mut toasts = ToastQueue::new();
        gallery.load_apps();

        gallery.apply_plugins(
            Err(ApiError::Status { endpoint: "plugins".into(), status: 500 }),
            &mut toasts,
        );

        assert_eq!(gallery.apps().len(), 2);
        assert!(gallery.plugins().is_empty());
        assert!(!gallery.plugins_loaded());
        assert_eq!(toasts.len(), 1);
        assert!(toasts.all()[0].message.starts_with("Error loading plugins: "));
    }
}
