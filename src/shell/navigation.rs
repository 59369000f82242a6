use log::{debug, warn};
use std::fmt;
use tokio::sync::broadcast;

const NAVIGATION_CAPACITY: usize = 64;

/// Screens the shell can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Mobile,
    Apps,
    Cases,
    Manual,
    Settings,
    RadionicsDeviceBase44,
    Cards,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Dashboard,
        Route::Mobile,
        Route::Apps,
        Route::Cases,
        Route::Manual,
        Route::Settings,
        Route::RadionicsDeviceBase44,
        Route::Cards,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Route::Dashboard => "DASHBOARD",
            Route::Mobile => "MOBILE",
            Route::Apps => "APPS",
            Route::Cases => "CASES",
            Route::Manual => "MANUAL",
            Route::Settings => "SETTINGS",
            Route::RadionicsDeviceBase44 => "RADIONICS_DEVICE_BASE44",
            Route::Cards => "CARDS",
        }
    }

    pub fn from_name(name: &str) -> Option<Route> {
        Self::ALL.into_iter().find(|route| route.name() == name)
    }

    /// Route for a navigation request; empty or unknown names go to the dashboard
    pub fn resolve(name: &str) -> Route {
        let name = name.trim();
        if name.is_empty() {
            return Route::Dashboard;
        }
        Self::from_name(name).unwrap_or_else(|| {
            debug!("Unknown route '{}', falling back to {}", name, Route::Dashboard);
            Route::Dashboard
        })
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Mobile => "Mobile",
            Route::Apps => "Apps & Plugins",
            Route::Cases => "Cases",
            Route::Manual => "Manual",
            Route::Settings => "Settings",
            Route::RadionicsDeviceBase44 => "Radionics Device Base 44",
            Route::Cards => "Radionics Cards",
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::Dashboard
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Publish point for navigation requests.
///
/// Any holder of a clone may request a route; the shell applies requests in
/// emission order.
#[derive(Clone)]
pub struct NavigationService {
    sender: broadcast::Sender<String>,
}

impl NavigationService {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NAVIGATION_CAPACITY);
        Self { sender }
    }

    pub fn navigate(&self, route_name: impl Into<String>) {
        let route_name = route_name.into();
        if self.sender.send(route_name.clone()).is_err() {
            warn!("Navigation to '{}' requested with no listener", route_name);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Default for NavigationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Route changes kept by [`ScreenRouter::history`]
pub const ROUTE_HISTORY_LIMIT: usize = 32;

/// Tracks the visible screen
#[derive(Debug, Clone, Default)]
pub struct ScreenRouter {
    current: Route,
    history: Vec<Route>,
}

impl ScreenRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&mut self, route: Route) {
        debug!("Route change {} -> {}", self.current, route);
        if self.history.len() == ROUTE_HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(route);
        self.current = route;
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Most recent route changes, oldest first
    pub fn history(&self) -> &[Route] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_names() {
        for route in Route::ALL {
            assert_eq!(Route::resolve(route.name()), route);
        }
    }

    #[test]
    fn test_resolve_falls_back_to_dashboard() {
        assert_eq!(Route::resolve(""), Route::Dashboard);
        assert_eq!(Route::resolve("   "), Route::Dashboard);
        assert_eq!(Route::resolve("NOWHERE"), Route::Dashboard);
        assert_eq!(Route::resolve("settings"), Route::Dashboard);
    }

    #[test]
    fn test_requests_arrive_in_order() {
        let navigation = NavigationService::new();
        let mut receiver = navigation.subscribe();

        navigation.navigate("MANUAL");
        navigation.navigate("SETTINGS");
        navigation.navigate("");

        assert_eq!(receiver.try_recv().unwrap(), "MANUAL");
        assert_eq!(receiver.try_recv().unwrap(), "SETTINGS");
        assert_eq!(receiver.try_recv().unwrap(), "");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_router_records_history() {
        let mut router = ScreenRouter::new();
        assert_eq!(router.current(), Route::Dashboard);
        assert!(router.history().is_empty());

        router.navigate(Route::Mobile);
        router.navigate(Route::Apps);
        assert_eq!(router.current(), Route::Apps);
        assert_eq!(router.history(), &[Route::Mobile, Route::Apps]);
    }

    #[test]
    fn test_router_history_is_bounded() {
        let mut router = ScreenRouter::new();
        for i in 0..1000 {
            router.navigate(if i % 2 == 0 { Route::Apps } else { Route::Cases });
        }

        assert_eq!(router.history().len(), ROUTE_HISTORY_LIMIT);
        assert_eq!(router.current(), Route::Cases);
        assert_eq!(router.history().last(), Some(&Route::Cases));
    }
}
