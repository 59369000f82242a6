use once_cell::sync::Lazy;
use regex::Regex;

/// Platform signatures that mark a user agent as mobile
static MOBILE_AGENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)android|webos|iphone|ipad|ipod|blackberry|iemobile|opera mini")
        .expect("mobile user agent pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn detect(user_agent: &str) -> Self {
        if MOBILE_AGENT.is_match(user_agent) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }
}

/// User agent describing this process, used when none is configured
pub fn default_user_agent() -> String {
    format!(
        "aether-cli/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
