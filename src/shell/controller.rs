use super::device::DeviceClass;
use super::links::{Link, LinkSet};
use super::navigation::{NavigationService, Route, ScreenRouter};
use super::theme::{DocumentRoot, THEME_ATTRIBUTE, THEME_PREFERENCE_KEY, ThemeMode};
use crate::api::Case;
use crate::config::PreferenceStore;
use crate::session::{CaseSubscription, DEFAULT_LIVENESS_INTERVAL, LivenessProbe, LivenessStatus, SessionGateway};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};

pub struct ShellOptions {
    pub user_agent: String,
    pub liveness_interval: Duration,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            user_agent: super::device::default_user_agent(),
            liveness_interval: DEFAULT_LIVENESS_INTERVAL,
        }
    }
}

/// Top-level screen controller.
///
/// Owns the theme, the side navigation, device detection and the liveness
/// probe. Navigation requests and current-case updates arrive through
/// channels and are applied by [`Shell::process_events`], so all state is
/// mutated from the task that owns the shell.
pub struct Shell {
    gateway: SessionGateway,
    navigation: NavigationService,
    document: Box<dyn DocumentRoot>,
    preferences: Box<dyn PreferenceStore>,
    user_agent: String,
    router: ScreenRouter,
    links: LinkSet,
    theme: ThemeMode,
    mobile_mode: bool,
    probe: LivenessProbe,
    navigation_rx: Option<broadcast::Receiver<String>>,
    case_subscription: Option<CaseSubscription>,
    current_case: Option<Case>,
    started: bool,
}

impl Shell {
    pub fn new(
        gateway: SessionGateway,
        navigation: NavigationService,
        document: Box<dyn DocumentRoot>,
        preferences: Box<dyn PreferenceStore>,
        options: ShellOptions,
    ) -> Self {
        Self {
            gateway,
            navigation,
            document,
            preferences,
            user_agent: options.user_agent,
            router: ScreenRouter::new(),
            links: LinkSet::new(),
            theme: ThemeMode::default(),
            mobile_mode: false,
            probe: LivenessProbe::new(options.liveness_interval),
            navigation_rx: None,
            case_subscription: None,
            current_case: None,
            started: false,
        }
    }

    /// Bring the shell up. Must run inside a tokio runtime.
    ///
    /// Calling it again is harmless: the probe and subscriptions are only
    /// created once.
    pub fn startup(&mut self) {
        if self.started {
            debug!("Shell already started");
            return;
        }
        self.started = true;

        self.theme = self
            .preferences
            .get(THEME_PREFERENCE_KEY)
            .as_deref()
            .and_then(ThemeMode::parse)
            .unwrap_or_default();
        self.document.set_attribute(THEME_ATTRIBUTE, self.theme.as_str());

        if DeviceClass::detect(&self.user_agent).is_mobile() {
            info!("Mobile device detected");
            self.mobile_mode = true;
            self.navigate(Route::Mobile.name());
        } else {
            info!("Desktop or laptop device detected");
            self.mobile_mode = false;
        }

        self.probe.start(self.gateway.api());
        self.links = LinkSet::standard();
        self.navigation_rx = Some(self.navigation.subscribe());
        self.case_subscription = Some(self.gateway.current_case().subscribe());
        self.process_events();
    }

    /// Activate the matching link and change route
    pub fn navigate(&mut self, route_name: &str) -> Route {
        let route = Route::resolve(route_name);
        self.links.activate(route.name());
        self.router.navigate(route);
        route
    }

    /// Apply pending navigation requests in emission order, then take the
    /// latest current case. Returns the number of navigations applied.
    pub fn process_events(&mut self) -> usize {
        let mut requests = Vec::new();
        if let Some(receiver) = self.navigation_rx.as_mut() {
            loop {
                match receiver.try_recv() {
                    Ok(name) => requests.push(name),
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!("Dropped {} navigation requests", skipped);
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                }
            }
        }

        for name in &requests {
            self.navigate(name);
        }

        if let Some(subscription) = self.case_subscription.as_mut() {
            if let Some(case) = subscription.try_next() {
                self.current_case = case;
            }
        }

        requests.len()
    }

    /// Flip the theme on the document root and persist it
    pub fn switch_theme(&mut self) -> ThemeMode {
        let next = match self.document.attribute(THEME_ATTRIBUTE).as_deref().and_then(ThemeMode::parse) {
            Some(ThemeMode::Dark) => ThemeMode::Light,
            _ => ThemeMode::Dark,
        };

        self.document.set_attribute(THEME_ATTRIBUTE, next.as_str());
        if let Err(e) = self.preferences.set(THEME_PREFERENCE_KEY, next.as_str()) {
            warn!("Failed to persist theme: {:#}", e);
        }
        self.theme = next;
        info!("Switched theme to {}", next);
        next
    }

    /// Search hook, intentionally empty
    pub fn search(&mut self, _query: &str) {}

    pub fn teardown(&mut self) {
        self.probe.stop();
        self.navigation_rx = None;
        self.case_subscription = None;
        self.started = false;
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn mobile_mode(&self) -> bool {
        self.mobile_mode
    }

    pub fn server_online(&self) -> bool {
        self.probe.is_online()
    }

    pub fn liveness(&self) -> LivenessStatus {
        self.probe.status()
    }

    pub fn is_probing(&self) -> bool {
        self.probe.is_running()
    }

    pub fn links(&self) -> &[Link] {
        self.links.as_slice()
    }

    pub fn current_route(&self) -> Route {
        self.router.current()
    }

    pub fn router(&self) -> &ScreenRouter {
        &self.router
    }

    pub fn current_case(&self) -> Option<&Case> {
        self.current_case.as_ref()
    }

    pub fn document(&self) -> &dyn DocumentRoot {
        self.document.as_ref()
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }

    pub fn gateway(&self) -> &SessionGateway {
        &self.gateway
    }

    pub fn navigation(&self) -> &NavigationService {
        &self.navigation
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.teardown();
    }
}
