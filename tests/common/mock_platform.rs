//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use review_gate::error::{Error, Result};
use review_gate::platform::PlatformService;
use review_gate::types::{PlatformConfig, PullRequestSnapshot};
use std::collections::HashMap;
use std::sync::Mutex;

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable snapshot per PR number
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    snapshots: Mutex<HashMap<u64, PullRequestSnapshot>>,
    // Call tracking
    snapshot_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_snapshot: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            snapshots: Mutex::new(HashMap::new()),
            snapshot_calls: Mutex::new(Vec::new()),
            error_on_snapshot: Mutex::new(None),
        }
    }

    /// Make `get_pull_request_snapshot` return an error
    pub fn fail_snapshot(&self, msg: &str) {
        *self.error_on_snapshot.lock().unwrap() = Some(msg.to_string());
    }

    /// Set the snapshot returned for `pr_number`
    pub fn set_snapshot(&self, pr_number: u64, snapshot: PullRequestSnapshot) {
        self.snapshots.lock().unwrap().insert(pr_number, snapshot);
    }

    /// PR numbers requested so far
    pub fn get_snapshot_calls(&self) -> Vec<u64> {
        self.snapshot_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pull_request_snapshot(&self, pr_number: u64) -> Result<PullRequestSnapshot> {
        self.snapshot_calls.lock().unwrap().push(pr_number);

        if let Some(msg) = self.error_on_snapshot.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        self.snapshots
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::PullRequestNotFound(format!("{}#{pr_number}", self.config)))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
