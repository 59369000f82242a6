//! In-process stand-in for the AetherOne server

#![allow(dead_code)]

use aether_cli::api::{AetherApi, ApiError, Case, PluginDescriptor};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
pub const IPHONE_UA: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";

pub struct FakeServer {
    online: AtomicBool,
    plugins_fail: AtomicBool,
    pings: AtomicUsize,
    cases: Mutex<Vec<Case>>,
    plugins: Vec<PluginDescriptor>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self {
            online: AtomicBool::new(true),
            plugins_fail: AtomicBool::new(false),
            pings: AtomicUsize::new(0),
            cases: Mutex::new(Vec::new()),
            plugins: vec![
                PluginDescriptor::new("Rates", "plugins/rates/index.html"),
                PluginDescriptor::new("Hijack", "https://evil.example/ui"),
            ],
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn fail_plugins(&self) {
        self.plugins_fail.store(true, Ordering::SeqCst);
    }

    pub fn pings(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    fn status_error(endpoint: &str) -> ApiError {
        ApiError::Status {
            endpoint: endpoint.to_string(),
            status: 503,
        }
    }
}

#[async_trait]
impl AetherApi for FakeServer {
    async fn ping(&self) -> Result<(), ApiError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Self::status_error("ping"))
        }
    }

    async fn save_case(&self, case: &Case) -> Result<Case, ApiError> {
        let mut cases = self.cases.lock().unwrap();
        let mut saved = case.clone();
        if saved.id.is_none() {
            saved.id = Some(cases.len() as i64 + 1);
        }
        cases.retain(|existing| existing.id != saved.id);
        cases.push(saved.clone());
        Ok(saved)
    }

    async fn load_all_cases(&self) -> Result<Vec<Case>, ApiError> {
        Ok(self.cases.lock().unwrap().clone())
    }

    async fn load_plugins(&self) -> Result<Vec<PluginDescriptor>, ApiError> {
        if self.plugins_fail.load(Ordering::SeqCst) {
            Err(Self::status_error("plugins"))
        } else {
            Ok(self.plugins.clone())
        }
    }
}
