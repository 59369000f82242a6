use super::channel::CaseChannel;
use super::liveness::ping_alive;
use crate::api::{AetherApi, AetherClient, ApiError, Case, PluginDescriptor};
use log::info;
use std::sync::Arc;

/// Entry point for every server call made by the UI, plus the shared
/// current-case channel.
///
/// Cloning is cheap; clones share the same API handle and case slot.
#[derive(Clone)]
pub struct SessionGateway {
    api: Arc<dyn AetherApi>,
    current_case: CaseChannel,
}

impl SessionGateway {
    pub fn new(api: Arc<dyn AetherApi>) -> Self {
        Self {
            api,
            current_case: CaseChannel::new(),
        }
    }

    pub fn from_client(client: AetherClient) -> Self {
        Self::new(Arc::new(client))
    }

    /// Handle for tasks that call the server on their own (liveness probe)
    pub fn api(&self) -> Arc<dyn AetherApi> {
        self.api.clone()
    }

    /// One liveness check, collapsed to a success/failure signal
    pub async fn check_liveness(&self) -> bool {
        ping_alive(self.api.as_ref()).await
    }

    pub async fn save_case(&self, case: &Case) -> Result<Case, ApiError> {
        self.api.save_case(case).await
    }

    pub async fn load_all_cases(&self) -> Result<Vec<Case>, ApiError> {
        self.api.load_all_cases().await
    }

    pub async fn load_plugins(&self) -> Result<Vec<PluginDescriptor>, ApiError> {
        self.api.load_plugins().await
    }

    pub fn current_case(&self) -> &CaseChannel {
        &self.current_case
    }

    /// Make `case` the current case for every observer
    pub fn select_case(&self, case: Case) {
        info!("Selected case {}", case.display_name());
        self.current_case.publish(case);
    }

    /// Save a case and publish the stored version as current
    pub async fn save_case_as_current(&self, case: &Case) -> Result<Case, ApiError> {
        let saved = self.api.save_case(case).await?;
        self.select_case(saved.clone());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingServer {
        saved: Mutex<Vec<Case>>,
    }

    #[async_trait]
    impl AetherApi for RecordingServer {
        async fn ping(&self) -> Result<(), ApiError> {
            Err(ApiError::Status { endpoint: "ping".into(), status: 500 })
        }

        async fn save_case(&self, case: &Case) -> Result<Case, ApiError> {
            let mut saved = self.saved.lock().unwrap();
            let stored = Case { id: Some(saved.len() as i64 + 1), ..case.clone() };
            saved.push(stored.clone());
            Ok(stored)
        }

        async fn load_all_cases(&self) -> Result<Vec<Case>, ApiError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn load_plugins(&self) -> Result<Vec<PluginDescriptor>, ApiError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_failed_ping_is_false() {
        let gateway = SessionGateway::new(Arc::new(RecordingServer::default()));
        assert!(!gateway.check_liveness().await);
    }

    #[tokio::test]
    async fn test_save_as_current_publishes_server_copy() {
        let gateway = SessionGateway::new(Arc::new(RecordingServer::default()));
        let mut subscription = gateway.current_case().subscribe();
        assert_eq!(subscription.try_next(), Some(None));

        let saved = gateway.save_case_as_current(&Case::new("Session")).await.unwrap();
        assert_eq!(saved.id, Some(1));

        let current = subscription.try_next().flatten().unwrap();
        assert_eq!(current, saved);
        assert_eq!(gateway.load_all_cases().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_case_slot() {
        let gateway = SessionGateway::new(Arc::new(RecordingServer::default()));
        let other = gateway.clone();

        other.select_case(Case::new("Shared"));
        assert_eq!(gateway.current_case().current().unwrap().name.as_deref(), Some("Shared"));
    }
}
