//! Refresh and send sequencing.
//!
//! [`Session`] holds everything an editing session owns: the default options
//! last fetched from the service and the policy being edited. The
//! [`SyncController`] owns nothing but its transport; it reads and replaces
//! session state through the conversions in [`nopas_policy`].
//!
//! A refresh needs `&mut Session` while a send only borrows it, so a single
//! session can never have both in flight at once.

use crate::error::{Error, Result};
use crate::transport::Transport;
use nopas_policy::{to_server, to_ui, PolicyUiState, Unsendable};
use serde_json::Value;
use tracing::{debug, info, warn};

/// State of one editing session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    defaults: Option<Value>,
    policy: Option<PolicyUiState>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already holding `policy`.
    #[must_use]
    pub fn with_policy(policy: PolicyUiState) -> Self {
        Self {
            defaults: None,
            policy: Some(policy),
        }
    }

    /// Default options last fetched from the service.
    pub const fn defaults(&self) -> Option<&Value> {
        self.defaults.as_ref()
    }

    /// Policy being edited, if one has been loaded.
    pub const fn policy(&self) -> Option<&PolicyUiState> {
        self.policy.as_ref()
    }

    /// Applies one edit to the loaded policy.
    ///
    /// The edit sees the current policy and returns its replacement. If it
    /// fails, the session keeps the policy it had.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoaded`] if no policy has been loaded, or the
    /// edit's own error.
    pub fn apply<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&PolicyUiState) -> nopas_policy::Result<PolicyUiState>,
    {
        let current = self.policy.as_ref().ok_or(Error::NotLoaded)?;
        let next = edit(current)?;
        self.policy = Some(next);
        Ok(())
    }
}

/// Why a send made no network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing has been loaded yet.
    NotLoaded,
    /// The edited policy is not in a sendable condition.
    Unsendable(Unsendable),
}

/// Result of [`SyncController::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The full document was written.
    Sent,
    /// No request was made.
    Skipped(SkipReason),
}

/// Sequences the calls against the policy service.
pub struct SyncController<T> {
    transport: T,
}

impl<T: Transport> SyncController<T> {
    /// Creates a controller over `transport`.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Reloads default options, then the policy.
    ///
    /// If the defaults call fails the session is untouched. If the policy
    /// call fails the new defaults are kept and the old policy stays. On
    /// success the policy is replaced wholesale, discarding unsent edits.
    ///
    /// # Errors
    ///
    /// Returns the first transport error.
    pub async fn refresh(&self, session: &mut Session) -> Result<()> {
        info!("Refreshing policy");

        let defaults = self.transport.fetch_defaults().await?;
        debug!("Fetched default options");
        session.defaults = Some(defaults);

        let document = self.transport.fetch_state().await?;
        let policy = to_ui(&document);
        info!(
            "Loaded policy with {} resources and {} subpolicies",
            policy.resources.len(),
            policy.subpolicies.len()
        );
        session.policy = Some(policy);
        Ok(())
    }

    /// Writes the session's policy back to the service.
    ///
    /// The session is not updated from the response; refresh afterwards to
    /// see changes applied by the service.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the write fails.
    pub async fn send(&self, session: &Session) -> Result<SendOutcome> {
        let Some(policy) = session.policy() else {
            warn!("Nothing to send, no policy loaded");
            return Ok(SendOutcome::Skipped(SkipReason::NotLoaded));
        };

        let document = match to_server(policy) {
            Ok(document) => document,
            Err(reason) => {
                warn!("Not sending policy: {}", reason);
                return Ok(SendOutcome::Skipped(SkipReason::Unsendable(reason)));
            }
        };

        self.transport.push_update(&document).await?;
        info!(
            "Sent policy with {} resources and {} subpolicies",
            document.resources.len(),
            document.subpolicies.len()
        );
        Ok(SendOutcome::Sent)
    }
}
