use crate::shell::Route;

/// Built-in application shipped with the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub name: String,
    pub route: Route,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl AppEntry {
    pub fn new(name: &str, route: Route) -> Self {
        Self {
            name: name.to_string(),
            route,
            image: None,
            description: None,
        }
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// The static apps catalogue. Not server-derived.
pub fn builtin_apps() -> Vec<AppEntry> {
    vec![
        AppEntry::new("Radionics Device Base 44", Route::RadionicsDeviceBase44)
            .with_image("assets/images/radionicsDeviceBased44.jpg")
            .with_description("Base 44 Radionics Device based on Benjamin Ludwig's design"),
        AppEntry::new("Radionics Cards", Route::Cards)
            .with_image("assets/images/radionicsCards.png")
            .with_description("Make radionics cards"),
    ]
}
