use aether_cli::api::{ApiError, Case, PluginDescriptor};
use aether_cli::config::PreferenceStore;
use aether_cli::gallery::{AppEntry, ERROR_TOAST_TIMEOUT, Notifier, PluginGallery, ToastQueue};
use aether_cli::session::SessionGateway;
use aether_cli::shell::{NavigationService, RootElement, Route, Shell, ShellOptions};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use reqwest::Url;
use std::time::Instant;
use tokio::sync::mpsc;

/// Results of background requests, applied on the UI task
#[derive(Debug)]
pub enum AppEvent {
    PluginsLoaded(Result<Vec<PluginDescriptor>, ApiError>),
    CasesLoaded(Result<Vec<Case>, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

/// Row of the apps screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryItem {
    App(usize),
    Plugin(usize),
}

pub struct App {
    shell: Shell,
    gallery: PluginGallery,
    toasts: ToastQueue,
    cases: Vec<Case>,
    cases_loading: bool,
    focus: Focus,
    sidebar_index: usize,
    content_index: usize,
    origin: Option<Url>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(
        gateway: SessionGateway,
        preferences: Box<dyn PreferenceStore>,
        options: ShellOptions,
        origin: Option<Url>,
    ) -> Self {
        let shell = Shell::new(
            gateway,
            NavigationService::new(),
            Box::new(RootElement::new()),
            preferences,
            options,
        );
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            shell,
            gallery: PluginGallery::new(),
            toasts: ToastQueue::new(),
            cases: Vec::new(),
            cases_loading: false,
            focus: Focus::Sidebar,
            sidebar_index: 0,
            content_index: 0,
            origin,
            events_tx,
            events_rx,
            should_quit: false,
        }
    }

    /// Start the shell and kick off the initial loads
    pub fn start(&mut self) {
        self.shell.startup();
        self.gallery.load_apps();
        self.reload();
    }

    pub fn reload(&mut self) {
        self.spawn_plugin_load();
        self.spawn_case_load();
    }

    fn spawn_plugin_load(&self) {
        let gateway = self.shell.gateway().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = gateway.load_plugins().await;
            let _ = tx.send(AppEvent::PluginsLoaded(result));
        });
    }

    fn spawn_case_load(&mut self) {
        self.cases_loading = true;
        let gateway = self.shell.gateway().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = gateway.load_all_cases().await;
            let _ = tx.send(AppEvent::CasesLoaded(result));
        });
    }

    /// Apply everything that arrived since the last frame
    pub fn tick(&mut self, now: Instant) {
        let route_before = self.shell.current_route();
        self.shell.process_events();

        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }

        if self.shell.current_route() != route_before {
            self.content_index = 0;
        }
        self.toasts.prune(now);
    }

    fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PluginsLoaded(result) => self.gallery.apply_plugins(result, &mut self.toasts),
            AppEvent::CasesLoaded(result) => {
                self.cases_loading = false;
                match result {
                    Ok(cases) => {
                        debug!("Loaded {} cases", cases.len());
                        self.cases = cases;
                    }
                    Err(e) => self.toasts.error(&format!("Error loading cases: {}", e), "Error", ERROR_TOAST_TIMEOUT),
                }
            }
        }
    }

    /// Returns false once the user asked to quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Esc => {
                if self.gallery.is_modal_open() {
                    self.gallery.on_modal_hidden();
                } else {
                    self.toasts.dismiss_latest();
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Content,
                    Focus::Content => Focus::Sidebar,
                };
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => self.activate_selection(),
            KeyCode::Char('t') => {
                self.shell.switch_theme();
            }
            KeyCode::Char('r') => {
                info!("Reloading cases and plugins");
                self.reload();
            }
            _ => {}
        }
        !self.should_quit
    }

    fn move_selection(&mut self, delta: isize) {
        let (index, len) = match self.focus {
            Focus::Sidebar => (&mut self.sidebar_index, self.shell.links().len()),
            Focus::Content => {
                let len = match self.shell.current_route() {
                    Route::Apps => self.gallery.apps().len() + self.gallery.plugins().len(),
                    Route::Cases => self.cases.len(),
                    _ => 0,
                };
                (&mut self.content_index, len)
            }
        };
        if len == 0 {
            *index = 0;
            return;
        }
        *index = index.saturating_add_signed(delta).min(len - 1);
    }

    fn activate_selection(&mut self) {
        match self.focus {
            Focus::Sidebar => {
                if let Some(link) = self.shell.links().get(self.sidebar_index) {
                    self.shell.navigation().navigate(link.name.clone());
                }
            }
            Focus::Content => match self.shell.current_route() {
                Route::Apps => match self.gallery_item(self.content_index) {
                    Some(GalleryItem::App(i)) => {
                        let route = self.gallery.apps()[i].route;
                        self.shell.navigation().navigate(route.name());
                    }
                    Some(GalleryItem::Plugin(i)) => {
                        let plugin = self.gallery.plugins()[i].clone();
                        self.gallery.open_plugin(&plugin, &mut self.toasts);
                    }
                    None => {}
                },
                Route::Cases => {
                    if let Some(case) = self.cases.get(self.content_index) {
                        self.shell.gateway().select_case(case.clone());
                    }
                }
                _ => {}
            },
        }
        self.tick(Instant::now());
    }

    pub fn gallery_item(&self, index: usize) -> Option<GalleryItem> {
        let apps = self.gallery.apps().len();
        if index < apps {
            Some(GalleryItem::App(index))
        } else if index < apps + self.gallery.plugins().len() {
            Some(GalleryItem::Plugin(index - apps))
        } else {
            None
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn gallery(&self) -> &PluginGallery {
        &self.gallery
    }

    pub fn apps(&self) -> &[AppEntry] {
        self.gallery.apps()
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn cases_loading(&self) -> bool {
        self.cases_loading
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn sidebar_index(&self) -> usize {
        self.sidebar_index
    }

    pub fn content_index(&self) -> usize {
        self.content_index
    }

    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_cli::api::AetherApi;
    use aether_cli::config::MemoryPreferences;
    use aether_cli::gallery::ToastLevel;
    use aether_cli::shell::ThemeMode;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct StubServer {
        plugins_fail: bool,
    }

    #[async_trait]
    impl AetherApi for StubServer {
        async fn ping(&self) -> Result<(), ApiError> {
            Ok(())
        }

        async fn save_case(&self, case: &Case) -> Result<Case, ApiError> {
            Ok(case.clone())
        }

        async fn load_all_cases(&self) -> Result<Vec<Case>, ApiError> {
            let mut anna = Case::new("Anna");
            anna.id = Some(1);
            let mut bo = Case::new("Bo");
            bo.id = Some(2);
            Ok(vec![anna, bo])
        }

        async fn load_plugins(&self) -> Result<Vec<PluginDescriptor>, ApiError> {
            if self.plugins_fail {
                Err(ApiError::Status { endpoint: "plugins".to_string(), status: 500 })
            } else {
                Ok(vec![
                    PluginDescriptor::new("Rates", "plugins/rates/index.html"),
                    PluginDescriptor::new("Evil", "//evil.example/x"),
                ])
            }
        }
    }

    fn app(plugins_fail: bool) -> App {
        let gateway = SessionGateway::new(Arc::new(StubServer { plugins_fail }));
        let options = ShellOptions {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            liveness_interval: Duration::from_secs(60),
        };
        App::new(gateway, Box::new(MemoryPreferences::default()), options, None)
    }

    async fn settle(app: &mut App) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        app.tick(Instant::now());
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_start_loads_plugins_and_cases() {
        let mut app = app(false);
        app.start();
        settle(&mut app).await;

        assert_eq!(app.gallery().plugins().len(), 2);
        assert_eq!(app.cases().len(), 2);
        assert!(!app.cases_loading());
        assert!(app.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_plugin_failure_becomes_toast() {
        let mut app = app(true);
        app.start();
        settle(&mut app).await;

        assert_eq!(app.toasts().len(), 1);
        assert_eq!(app.toasts().all()[0].level, ToastLevel::Error);
        assert_eq!(app.apps().len(), 2);
    }

    #[tokio::test]
    async fn test_sidebar_enter_navigates() {
        let mut app = app(false);
        app.start();

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.shell().current_route(), Route::Cases);
        let active: Vec<_> = app.shell().links().iter().filter(|l| l.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "CASES");
    }

    #[tokio::test]
    async fn test_opening_plugins_from_apps_screen() {
        let mut app = app(false);
        app.start();
        settle(&mut app).await;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.shell().current_route(), Route::Apps);

        press(&mut app, KeyCode::Tab);
        // Two built-in apps come first
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.gallery().is_modal_open());
        assert_eq!(app.gallery().selected_url().unwrap().as_str(), "/plugins/rates/index.html");

        press(&mut app, KeyCode::Esc);
        assert!(!app.gallery().is_modal_open());
        assert!(app.gallery().selected_plugin().is_none());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(!app.gallery().is_modal_open());
        assert_eq!(app.toasts().len(), 1);
    }

    #[tokio::test]
    async fn test_selecting_case_updates_shell() {
        let mut app = app(false);
        app.start();
        settle(&mut app).await;

        app.shell.navigate("CASES");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.shell().current_case().and_then(|c| c.id), Some(2));
    }

    #[tokio::test]
    async fn test_theme_key_and_quit() {
        let mut app = app(false);
        app.start();
        assert_eq!(app.shell().theme(), ThemeMode::Light);

        assert!(press(&mut app, KeyCode::Char('t')));
        assert_eq!(app.shell().theme(), ThemeMode::Dark);

        assert!(!press(&mut app, KeyCode::Char('q')));
    }
}
