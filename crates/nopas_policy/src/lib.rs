//! Autoscaling policy model for Nopas.
//!
//! This crate provides:
//! - The server-side [`PolicyDocument`] exchanged with the policy service
//! - The editable [`PolicyUiState`] keyed by resource and subpolicy name
//! - Conversions between the two ([`to_ui`], [`to_server`])
//! - Name-checked edits over [`NamedCollection`]s
//!
//! # Example
//!
//! ```rust
//! use nopas_policy::{to_server, to_ui, PolicyDocument, ResourceField, ResourceFields};
//!
//! let doc = PolicyDocument::from_json(r#"{"CheckingFreq": "1m", "Ensembler": "max"}"#).unwrap();
//! let state = to_ui(&doc)
//!     .add_resource("web", ResourceFields::default())
//!     .and_then(|s| s.update_resource("web", ResourceField::Ratio, "2.5"))
//!     .unwrap();
//!
//! let out = to_server(&state).unwrap();
//! assert_eq!(out.resources[0].name, "web");
//! assert!((out.resources[0].ratio - 2.5).abs() < f64::EPSILON);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod collection;
pub mod convert;
pub mod error;
pub mod model;
pub mod ui;

pub use collection::{CollectionError, Editable, NamedCollection};
pub use convert::{to_server, to_ui, Unsendable};
pub use error::{Error, Result};
pub use model::{ParameterBlock, PolicyDocument, ResourceRecord, SubpolicyRecord};
pub use ui::{
    JsonInput, NumericInput, ParameterInput, ParameterInputs, PolicyUiState, Provider,
    ResourceField, ResourceFields, SubpolicyField, SubpolicyFields,
};
