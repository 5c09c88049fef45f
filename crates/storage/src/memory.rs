use anyhow::Result;
use async_trait::async_trait;
use shared::domain::Request;
use tokio::sync::Mutex;

use crate::RequestStore;

/// Keeps the list in process memory only; gone on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    requests: Mutex<Vec<Request>>,
}

impl MemoryStore {
    pub fn with_requests(requests: Vec<Request>) -> Self {
        Self {
            requests: Mutex::new(requests),
        }
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn load(&self) -> Result<Vec<Request>> {
        Ok(self.requests.lock().await.clone())
    }

    async fn save(&self, requests: &[Request]) -> Result<()> {
        *self.requests.lock().await = requests.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
