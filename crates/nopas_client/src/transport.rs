//! Transport seam between the sync controller and the policy service.

use crate::error::Result;
use async_trait::async_trait;
use nopas_policy::PolicyDocument;
use serde_json::Value;

/// Path of the default options list.
pub const PREDEFINED_PATH: &str = "/predefined";
/// Path of the current policy.
pub const STATE_PATH: &str = "/state";
/// Path accepting a full replacement policy.
pub const UPDATE_PATH: &str = "/update";

/// Calls against the policy service.
///
/// Every call either yields its body or an error; there is no retry and no
/// timeout beyond what the implementation enforces itself.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the list of available default options.
    async fn fetch_defaults(&self) -> Result<Value>;

    /// Fetches the current policy document.
    async fn fetch_state(&self) -> Result<PolicyDocument>;

    /// Replaces the policy with `document`. The response body is ignored.
    async fn push_update(&self, document: &PolicyDocument) -> Result<()>;
}
