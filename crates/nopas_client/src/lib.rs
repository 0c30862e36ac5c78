//! Policy service client for Nopas.
//!
//! This crate provides:
//! - The [`Transport`] seam and its HTTP implementation
//! - The editing [`Session`] and the [`SyncController`] that refreshes and
//!   sends it
//!
//! # Example
//!
//! ```rust,ignore
//! use nopas_client::{ClientConfig, HttpTransport, Session, SyncController};
//!
//! let controller = SyncController::new(HttpTransport::new(ClientConfig::default())?);
//! let mut session = Session::new();
//! controller.refresh(&mut session).await?;
//! session.apply(|policy| Ok(policy.set_ensembler("conservative")))?;
//! controller.send(&session).await?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod error;
pub mod sync;
pub mod transport;

pub use client::{ClientConfig, HttpTransport, ENDPOINT_ENV};
pub use error::{Error, Result};
pub use sync::{SendOutcome, Session, SkipReason, SyncController};
pub use transport::Transport;
