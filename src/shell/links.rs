use super::navigation::Route;

/// Side navigation entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub name: String,
    pub active: bool,
    pub background_color: String,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    links: Vec<Link>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed menu shown by the shell
    pub fn standard() -> Self {
        let mut links = Self::new();
        links.add(Route::Dashboard.name(), false, "#1e1e2e", "#fff");
        links.add(Route::Apps.name(), false, "#6f42c1", "#fff");
        links.add(Route::Cases.name(), false, "#198754", "#fff");
        links.add(Route::Manual.name(), false, "#133185", "#fff");
        links.add(Route::Settings.name(), false, "#ff9520", "#000");
        links
    }

    pub fn add(&mut self, name: &str, active: bool, background_color: &str, color: &str) {
        self.links.push(Link {
            name: name.to_string(),
            active,
            background_color: background_color.to_string(),
            color: color.to_string(),
        });
    }

    /// Mark the link named `route_name` active and every other link inactive.
    /// An empty name counts as the dashboard. Returns whether a link matched.
    pub fn activate(&mut self, route_name: &str) -> bool {
        let target = if route_name.is_empty() { Route::Dashboard.name() } else { route_name };

        let mut matched = false;
        for link in &mut self.links {
            link.active = !matched && link.name == target;
            matched |= link.active;
        }
        matched
    }

    pub fn active(&self) -> Option<&Link> {
        self.links.iter().find(|link| link.active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn as_slice(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
