//! Conversions between the server document and the editable state.
//!
//! [`to_ui`] runs on every refresh and [`to_server`] on every send. Neither
//! panics. For documents with unique names, finite ratios and the required
//! scalar fields filled in, `to_server(&to_ui(&doc)) == Ok(doc)`.

use crate::collection::NamedCollection;
use crate::model::{ParameterBlock, PolicyDocument, ResourceRecord, SubpolicyRecord};
use crate::ui::{
    parameter_inputs, JsonInput, NumericInput, ParameterInputs, PolicyUiState, ResourceFields,
    SubpolicyFields,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons an editable state cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsendable {
    /// The checking frequency is blank.
    #[error("checking frequency is empty")]
    EmptyCheckingFrequency,

    /// The ensembler is blank.
    #[error("ensembler is empty")]
    EmptyEnsembler,

    /// A subpolicy's metadata text is not valid JSON.
    #[error("metadata of subpolicy '{subpolicy}' is not valid JSON: {reason}")]
    InvalidMetadata {
        /// Subpolicy name.
        subpolicy: String,
        /// Parser message.
        reason: String,
    },
}

/// Builds the editable state from a server document.
///
/// Records keep their array order. A name that appears twice keeps its first
/// position and takes the later record's fields.
pub fn to_ui(doc: &PolicyDocument) -> PolicyUiState {
    let mut resources = NamedCollection::new();
    for record in &doc.resources {
        if resources.insert_or_replace(record.name.clone(), resource_fields(record)) {
            warn!("Duplicate resource '{}' in policy document", record.name);
        }
    }

    let mut subpolicies = NamedCollection::new();
    for record in &doc.subpolicies {
        if subpolicies.insert_or_replace(record.name.clone(), subpolicy_fields(record)) {
            warn!("Duplicate subpolicy '{}' in policy document", record.name);
        }
    }

    debug!(
        "Loaded policy with {} resources and {} subpolicies",
        resources.len(),
        subpolicies.len()
    );

    PolicyUiState {
        checking_frequency: doc.checking_frequency.clone(),
        ensembler: doc.ensembler.clone(),
        resources,
        subpolicies,
        extra: doc.extra.clone(),
    }
}

/// Builds the server document from the editable state.
///
/// Pending ratio and numeric parameter text is coerced to a number; input
/// that is not a finite number becomes `0`.
///
/// # Errors
///
/// Returns [`Unsendable`] when the state lacks required fields or holds
/// metadata that is not JSON. Callers must not send in that case.
pub fn to_server(state: &PolicyUiState) -> Result<PolicyDocument, Unsendable> {
    if state.checking_frequency.trim().is_empty() {
        return Err(Unsendable::EmptyCheckingFrequency);
    }
    if state.ensembler.trim().is_empty() {
        return Err(Unsendable::EmptyEnsembler);
    }

    let resources = state
        .resources
        .iter()
        .map(|(name, fields)| resource_record(name, fields))
        .collect();

    let subpolicies = state
        .subpolicies
        .iter()
        .map(|(name, fields)| subpolicy_record(state, name, fields))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PolicyDocument {
        checking_frequency: state.checking_frequency.clone(),
        ensembler: state.ensembler.clone(),
        resources,
        subpolicies,
        extra: state.extra.clone(),
    })
}

fn resource_fields(record: &ResourceRecord) -> ResourceFields {
    ResourceFields {
        scale_in_cooldown: record.scale_in_cooldown.clone(),
        scale_out_cooldown: record.scale_out_cooldown.clone(),
        ratio: NumericInput::Value(record.ratio),
        nomad_params: parameter_inputs(&record.nomad_params),
        ec2_params: parameter_inputs(&record.ec2_params),
        extra: record.extra.clone(),
    }
}

fn subpolicy_fields(record: &SubpolicyRecord) -> SubpolicyFields {
    SubpolicyFields {
        managed_resources: record.managed_resources.clone(),
        metadata: JsonInput::Value(record.metadata.clone()),
        extra: record.extra.clone(),
    }
}

fn resource_record(name: &str, fields: &ResourceFields) -> ResourceRecord {
    if !fields.ratio.is_valid() {
        warn!(
            "Ratio '{}' of resource '{}' is not a number, sending 0",
            fields.ratio, name
        );
    }

    ResourceRecord {
        name: name.to_string(),
        scale_in_cooldown: fields.scale_in_cooldown.clone(),
        scale_out_cooldown: fields.scale_out_cooldown.clone(),
        ratio: fields.ratio.coerce(),
        nomad_params: parameter_block(name, "Nomad", &fields.nomad_params),
        ec2_params: parameter_block(name, "EC2", &fields.ec2_params),
        extra: fields.extra.clone(),
    }
}

fn parameter_block(resource: &str, provider: &str, inputs: &ParameterInputs) -> ParameterBlock {
    inputs.map_values(|key, input| {
        if !input.is_valid() {
            warn!(
                "{} parameter {} '{}' of resource '{}' is not a number, sending 0",
                provider, key, input, resource
            );
        }
        input.to_value()
    })
}

fn subpolicy_record(
    state: &PolicyUiState,
    name: &str,
    fields: &SubpolicyFields,
) -> Result<SubpolicyRecord, Unsendable> {
    let metadata = fields
        .metadata
        .parse()
        .map_err(|e| Unsendable::InvalidMetadata {
            subpolicy: name.to_string(),
            reason: e.to_string(),
        })?;

    for managed in &fields.managed_resources {
        if !state.resources.contains(managed) {
            warn!("Subpolicy '{}' manages unknown resource '{}'", name, managed);
        }
    }

    Ok(SubpolicyRecord {
        name: name.to_string(),
        managed_resources: fields.managed_resources.clone(),
        metadata,
        extra: fields.extra.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Provider, ResourceField, SubpolicyField};
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn record(name: &str, ratio: f64) -> ResourceRecord {
        ResourceRecord {
            name: name.to_string(),
            scale_in_cooldown: "60s".to_string(),
            scale_out_cooldown: "120s".to_string(),
            ratio,
            nomad_params: serde_json::from_value(json!({"JobName": name, "MaxCount": 5}))
                .unwrap(),
            ec2_params: serde_json::from_value(json!({"Region": "ap-southeast-1"})).unwrap(),
            extra: Map::new(),
        }
    }

    fn document() -> PolicyDocument {
        let mut extra = Map::new();
        extra.insert("Revision".to_string(), Value::from(7));
        PolicyDocument {
            checking_frequency: "1m".to_string(),
            ensembler: "conservative".to_string(),
            resources: vec![record("web", 1.0), record("batch", 2.0)],
            subpolicies: vec![SubpolicyRecord {
                name: "CoreRatio".to_string(),
                managed_resources: vec!["web".to_string(), "batch".to_string()],
                metadata: json!({"MaxCpu": 0.75}),
                extra: Map::new(),
            }],
            extra,
        }
    }

    #[test]
    fn round_trip_preserves_document() {
        let doc = document();
        assert_eq!(to_server(&to_ui(&doc)), Ok(doc));
    }

    #[test]
    fn to_ui_is_deterministic() {
        let doc = document();
        assert_eq!(to_ui(&doc), to_ui(&doc));
    }

    #[test]
    fn to_ui_keeps_array_order() {
        let state = to_ui(&document());
        assert_eq!(state.resources.names().collect::<Vec<_>>(), ["web", "batch"]);
    }

    #[test]
    fn duplicate_names_keep_first_position_and_last_fields() {
        let mut doc = document();
        doc.resources.push(record("web", 9.0));
        let state = to_ui(&doc);
        assert_eq!(state.resources.names().collect::<Vec<_>>(), ["web", "batch"]);
        assert_eq!(
            state.resources.get("web").unwrap().ratio,
            NumericInput::Value(9.0)
        );
    }

    #[test]
    fn pending_ratio_is_coerced() {
        let state = to_ui(&document())
            .update_resource("web", ResourceField::Ratio, "2.5")
            .unwrap();
        let doc = to_server(&state).unwrap();
        assert!((doc.resources[0].ratio - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_ratio_is_sent_as_zero() {
        let state = to_ui(&document())
            .update_resource("batch", ResourceField::Ratio, "two")
            .unwrap();
        let doc = to_server(&state).unwrap();
        assert!(doc.resources[1].ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn blank_required_fields_are_unsendable() {
        let state = to_ui(&document());
        assert_eq!(
            to_server(&state.set_checking_frequency(" ")),
            Err(Unsendable::EmptyCheckingFrequency)
        );
        assert_eq!(
            to_server(&state.set_ensembler("")),
            Err(Unsendable::EmptyEnsembler)
        );
    }

    #[test]
    fn broken_metadata_is_unsendable() {
        let state = to_ui(&document())
            .update_subpolicy("CoreRatio", SubpolicyField::Metadata, "{\"MaxCpu\":")
            .unwrap();
        assert!(matches!(
            to_server(&state),
            Err(Unsendable::InvalidMetadata { subpolicy, .. }) if subpolicy == "CoreRatio"
        ));

        let fixed = state
            .update_subpolicy("CoreRatio", SubpolicyField::Metadata, "{\"MaxCpu\": 0.5}")
            .unwrap();
        let doc = to_server(&fixed).unwrap();
        assert_eq!(doc.subpolicies[0].metadata, json!({"MaxCpu": 0.5}));
    }

    #[test]
    fn edits_flow_through_to_records() {
        let state = to_ui(&document())
            .rename_resource("web", "frontend")
            .and_then(|s| s.add_resource("gpu", ResourceFields::with_defaults()))
            .unwrap()
            .delete_resource("batch");
        let doc = to_server(&state).unwrap();

        let names: Vec<_> = doc.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["frontend", "gpu"]);
        assert_eq!(doc.subpolicies[0].managed_resources, ["frontend"]);
        assert_eq!(doc.extra.get("Revision"), Some(&Value::from(7)));
    }

    #[test]
    fn parameter_edits_keep_wire_types() {
        let state = to_ui(&document())
            .set_parameter("web", Provider::Nomad, "JobName", "2024")
            .and_then(|s| s.set_parameter("web", Provider::Nomad, "MaxCount", "1."))
            .unwrap();
        let doc = to_server(&state).unwrap();

        let params = serde_json::to_value(&doc.resources[0].nomad_params).unwrap();
        assert_eq!(params, json!({"JobName": "2024", "MaxCount": 1}));
    }

    #[test]
    fn unedited_parameters_pass_through() {
        let mut doc = document();
        doc.resources[0].ec2_params = serde_json::from_value(json!({
            "Region": "ap-southeast-1",
            "Tags": {"team": "ops"},
            "Spot": true,
            "Weight": 0.25
        }))
        .unwrap();

        let state = to_ui(&doc)
            .set_parameter("web", Provider::Ec2, "Region", "us-east-1")
            .unwrap();
        let back = to_server(&state).unwrap();

        let params = serde_json::to_value(&back.resources[0].ec2_params).unwrap();
        assert_eq!(
            params,
            json!({
                "Region": "us-east-1",
                "Tags": {"team": "ops"},
                "Spot": true,
                "Weight": 0.25
            })
        );
    }

    fn resource_strategy(name: String) -> impl Strategy<Value = ResourceRecord> {
        (
            "[0-9]{1,3}[smh]",
            "[0-9]{1,3}[smh]",
            -1.0e6..1.0e6f64,
            0u32..100,
        )
            .prop_map(move |(scale_in, scale_out, ratio, max)| ResourceRecord {
                name: name.clone(),
                scale_in_cooldown: scale_in,
                scale_out_cooldown: scale_out,
                ratio,
                nomad_params: serde_json::from_value(json!({"MaxCount": max})).unwrap(),
                ec2_params: ParameterBlock::new(),
                extra: Map::new(),
            })
    }

    fn document_strategy() -> impl Strategy<Value = PolicyDocument> {
        (
            prop::collection::hash_set("[a-z]{1,8}", 0..6),
            prop::collection::hash_set("[A-Z][a-z]{1,8}", 0..4),
            "[0-9]{1,2}m",
            "[a-z]{3,10}",
        )
            .prop_flat_map(|(resource_names, subpolicy_names, frequency, ensembler)| {
                let resource_names: Vec<String> = resource_names.into_iter().collect();
                let managed = resource_names.clone();
                let resources: Vec<_> = resource_names.into_iter().map(resource_strategy).collect();
                let subpolicies: Vec<SubpolicyRecord> = subpolicy_names
                    .into_iter()
                    .map(|name| SubpolicyRecord {
                        name,
                        managed_resources: managed.clone(),
                        metadata: json!({"Default": 1}),
                        extra: Map::new(),
                    })
                    .collect();
                (resources, Just(subpolicies), Just(frequency), Just(ensembler))
            })
            .prop_map(|(resources, subpolicies, frequency, ensembler)| PolicyDocument {
                checking_frequency: frequency,
                ensembler,
                resources,
                subpolicies,
                extra: Map::new(),
            })
    }

    proptest! {
        #[test]
        fn round_trip_law(doc in document_strategy()) {
            prop_assert_eq!(to_server(&to_ui(&doc)), Ok(doc));
        }

        #[test]
        fn refresh_is_idempotent(doc in document_strategy()) {
            prop_assert_eq!(to_ui(&doc), to_ui(&doc));
        }
    }
}
