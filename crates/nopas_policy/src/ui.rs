//! Editable policy state.
//!
//! [`PolicyUiState`] is the form-side view of a [`PolicyDocument`]: named
//! records become [`NamedCollection`] entries so a single field can be found
//! and changed by name. Inputs that must eventually be numbers or JSON are
//! held as the raw text the operator typed until the state is converted back
//! with [`to_server`].
//!
//! [`PolicyDocument`]: crate::model::PolicyDocument
//! [`to_server`]: crate::convert::to_server

use crate::collection::{CollectionError, Editable, NamedCollection};
use crate::error::Error;
use crate::model::{parameter_template, ParameterBlock, EC2_PARAMETER_KEYS, NOMAD_PARAMETER_KEYS};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A numeric form input.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericInput {
    /// A committed number.
    Value(f64),
    /// Text typed so far, possibly not yet a number (`"1."`, `""`).
    Pending(String),
}

impl NumericInput {
    /// Returns the number this input stands for.
    ///
    /// Blank, unparseable and non-finite input becomes `0`.
    pub fn coerce(&self) -> f64 {
        self.parsed().unwrap_or(0.0)
    }

    /// Returns true if [`coerce`](Self::coerce) would not have to fall back.
    pub fn is_valid(&self) -> bool {
        self.parsed().is_some()
    }

    fn parsed(&self) -> Option<f64> {
        let value = match self {
            Self::Value(value) => Some(*value),
            Self::Pending(raw) => raw.trim().parse::<f64>().ok(),
        };
        value.filter(|value| value.is_finite())
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Pending(raw) => f.write_str(raw),
        }
    }
}

/// A JSON form input.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonInput {
    /// A committed JSON value.
    Value(Value),
    /// JSON text typed so far.
    Pending(String),
}

impl JsonInput {
    /// Parses the input into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if pending text is not valid JSON.
    pub fn parse(&self) -> serde_json::Result<Value> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Pending(raw) => serde_json::from_str(raw),
        }
    }
}

/// A provider parameter value.
///
/// Edits keep the JSON type of the value they replace: string parameters stay
/// strings, numeric parameters hold the typed text until [`to_value`] coerces
/// it. Only new keys have their type guessed from the text.
///
/// [`to_value`]: Self::to_value
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterInput {
    /// A committed JSON value, sent unchanged.
    Value(Value),
    /// Text typed into a numeric parameter.
    Number {
        /// Text typed so far.
        raw: String,
        /// Whether the parameter holds whole numbers.
        integer: bool,
    },
}

impl ParameterInput {
    /// Reads the text of a new parameter as a JSON scalar literal (`5`,
    /// `true`, `"text"`), falling back to the text itself.
    pub fn from_raw(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) if !value.is_object() && !value.is_array() => Self::Value(value),
            _ => Self::Value(Value::String(raw.to_string())),
        }
    }

    /// Returns the JSON value to send.
    ///
    /// Numeric text that is blank, unparseable or non-finite becomes `0`.
    /// Integer parameters drop any fractional part.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Number { raw, integer } => {
                let number = NumericInput::Pending(raw.clone()).coerce();
                if *integer {
                    Value::from(truncate(number))
                } else {
                    Value::from(number)
                }
            }
        }
    }

    /// Returns true if [`to_value`](Self::to_value) would not have to fall back.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Value(_) => true,
            Self::Number { raw, .. } => NumericInput::Pending(raw.clone()).is_valid(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(number: f64) -> i64 {
    number.trunc() as i64
}

impl Serialize for ParameterInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl fmt::Display for ParameterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(Value::String(text)) => f.write_str(text),
            Self::Value(value) => write!(f, "{value}"),
            Self::Number { raw, .. } => f.write_str(raw),
        }
    }
}

impl Editable for ParameterInput {
    type Field = ();

    fn set_field(&mut self, _: &(), raw: &str) {
        let next = match self {
            Self::Value(Value::String(_)) => Self::Value(Value::String(raw.to_string())),
            Self::Value(Value::Number(number)) => Self::Number {
                raw: raw.to_string(),
                integer: !number.is_f64(),
            },
            Self::Number { integer, .. } => Self::Number {
                raw: raw.to_string(),
                integer: *integer,
            },
            Self::Value(Value::Bool(_)) => match raw.trim() {
                "true" => Self::Value(Value::Bool(true)),
                "false" => Self::Value(Value::Bool(false)),
                _ => Self::from_raw(raw),
            },
            Self::Value(_) => Self::from_raw(raw),
        };
        *self = next;
    }
}

/// Editable provider parameters, by key.
pub type ParameterInputs = NamedCollection<ParameterInput>;

/// Wraps committed parameter values for editing.
pub(crate) fn parameter_inputs(block: &ParameterBlock) -> ParameterInputs {
    block.map_values(|_, value| ParameterInput::Value(value.clone()))
}

/// Parameter provider of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Nomad job parameters.
    Nomad,
    /// EC2 auto scaling group parameters.
    Ec2,
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nomad" => Ok(Self::Nomad),
            "ec2" => Ok(Self::Ec2),
            _ => Err(Error::UnknownProvider(s.to_string())),
        }
    }
}

/// Editable fields of one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFields {
    /// Minimum wait after a scale-in.
    pub scale_in_cooldown: String,
    /// Minimum wait after a scale-out.
    pub scale_out_cooldown: String,
    /// Nomad task count per EC2 instance.
    pub ratio: NumericInput,
    /// Nomad job parameters.
    pub nomad_params: ParameterInputs,
    /// EC2 auto scaling group parameters.
    pub ec2_params: ParameterInputs,
    /// Resource fields not modelled here.
    pub extra: Map<String, Value>,
}

impl Default for ResourceFields {
    fn default() -> Self {
        Self {
            scale_in_cooldown: String::new(),
            scale_out_cooldown: String::new(),
            ratio: NumericInput::Value(1.0),
            nomad_params: ParameterInputs::new(),
            ec2_params: ParameterInputs::new(),
            extra: Map::new(),
        }
    }
}

impl ResourceFields {
    /// Defaults with every known provider parameter present.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            nomad_params: parameter_inputs(&parameter_template(&NOMAD_PARAMETER_KEYS)),
            ec2_params: parameter_inputs(&parameter_template(&EC2_PARAMETER_KEYS)),
            ..Self::default()
        }
    }

    /// Returns the parameter block of `provider`.
    pub const fn params(&self, provider: Provider) -> &ParameterInputs {
        match provider {
            Provider::Nomad => &self.nomad_params,
            Provider::Ec2 => &self.ec2_params,
        }
    }

    fn params_mut(&mut self, provider: Provider) -> &mut ParameterInputs {
        match provider {
            Provider::Nomad => &mut self.nomad_params,
            Provider::Ec2 => &mut self.ec2_params,
        }
    }
}

/// Editable text fields of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceField {
    /// `ScaleInCooldown`.
    ScaleInCooldown,
    /// `ScaleOutCooldown`.
    ScaleOutCooldown,
    /// `N2CRatio`, kept as typed until conversion.
    Ratio,
}

impl FromStr for ResourceField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scale-in-cooldown" | "ScaleInCooldown" => Ok(Self::ScaleInCooldown),
            "scale-out-cooldown" | "ScaleOutCooldown" => Ok(Self::ScaleOutCooldown),
            "ratio" | "N2CRatio" => Ok(Self::Ratio),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

impl Editable for ResourceFields {
    type Field = ResourceField;

    fn set_field(&mut self, field: &ResourceField, raw: &str) {
        match field {
            ResourceField::ScaleInCooldown => self.scale_in_cooldown = raw.to_string(),
            ResourceField::ScaleOutCooldown => self.scale_out_cooldown = raw.to_string(),
            ResourceField::Ratio => self.ratio = NumericInput::Pending(raw.to_string()),
        }
    }
}

/// Editable fields of one subpolicy.
#[derive(Debug, Clone, PartialEq)]
pub struct SubpolicyFields {
    /// Names of the resources this subpolicy manages.
    pub managed_resources: Vec<String>,
    /// Subpolicy-specific settings.
    pub metadata: JsonInput,
    /// Subpolicy fields not modelled here.
    pub extra: Map<String, Value>,
}

impl Default for SubpolicyFields {
    fn default() -> Self {
        Self {
            managed_resources: Vec::new(),
            metadata: JsonInput::Value(Value::Object(Map::new())),
            extra: Map::new(),
        }
    }
}

/// Editable text fields of a subpolicy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubpolicyField {
    /// Comma separated resource names.
    ManagedResources,
    /// JSON text.
    Metadata,
}

impl FromStr for SubpolicyField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "managed-resources" | "ManagedResources" => Ok(Self::ManagedResources),
            "metadata" | "Metadata" => Ok(Self::Metadata),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

impl Editable for SubpolicyFields {
    type Field = SubpolicyField;

    fn set_field(&mut self, field: &SubpolicyField, raw: &str) {
        match field {
            SubpolicyField::ManagedResources => {
                self.managed_resources = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            SubpolicyField::Metadata => self.metadata = JsonInput::Pending(raw.to_string()),
        }
    }
}

/// The whole policy as edited by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyUiState {
    /// How often the autoscaler evaluates the policy.
    pub checking_frequency: String,
    /// Strategy used to combine subpolicy recommendations.
    pub ensembler: String,
    /// Resources by name, in display order.
    pub resources: NamedCollection<ResourceFields>,
    /// Subpolicies by name, in display order.
    pub subpolicies: NamedCollection<SubpolicyFields>,
    /// Document fields not modelled here.
    pub extra: Map<String, Value>,
}

impl PolicyUiState {
    /// Replaces the checking frequency.
    #[must_use]
    pub fn set_checking_frequency(&self, value: &str) -> Self {
        Self {
            checking_frequency: value.to_string(),
            ..self.clone()
        }
    }

    /// Replaces the ensembler.
    #[must_use]
    pub fn set_ensembler(&self, value: &str) -> Self {
        Self {
            ensembler: value.to_string(),
            ..self.clone()
        }
    }

    /// Appends a resource.
    ///
    /// # Errors
    ///
    /// Fails if the name is blank or already used by another resource.
    pub fn add_resource(&self, name: &str, fields: ResourceFields) -> Result<Self, CollectionError> {
        Ok(Self {
            resources: self.resources.add(name, fields)?,
            ..self.clone()
        })
    }

    /// Renames a resource and every subpolicy reference to it.
    ///
    /// A subpolicy that already lists `new` keeps a single entry for it, at
    /// the first of the two positions.
    ///
    /// # Errors
    ///
    /// Fails if `old` is absent or `new` is blank or taken.
    pub fn rename_resource(&self, old: &str, new: &str) -> Result<Self, CollectionError> {
        let resources = self.resources.rename(old, new)?;
        if old == new {
            return Ok(self.clone());
        }

        let subpolicies = self.subpolicies.map_values(|_, fields| {
            let mut managed_resources: Vec<String> =
                Vec::with_capacity(fields.managed_resources.len());
            for managed in &fields.managed_resources {
                let managed = if managed == old { new } else { managed.as_str() };
                if managed == new && managed_resources.iter().any(|m| m == new) {
                    continue;
                }
                managed_resources.push(managed.to_string());
            }
            SubpolicyFields {
                managed_resources,
                ..fields.clone()
            }
        });

        Ok(Self {
            resources,
            subpolicies,
            ..self.clone()
        })
    }

    /// Removes a resource and drops it from every subpolicy.
    ///
    /// Absent names leave the state unchanged.
    #[must_use]
    pub fn delete_resource(&self, name: &str) -> Self {
        if !self.resources.contains(name) {
            return self.clone();
        }

        let subpolicies = self.subpolicies.map_values(|_, fields| SubpolicyFields {
            managed_resources: fields
                .managed_resources
                .iter()
                .filter(|managed| *managed != name)
                .cloned()
                .collect(),
            ..fields.clone()
        });

        Self {
            resources: self.resources.delete(name),
            subpolicies,
            ..self.clone()
        }
    }

    /// Stores raw text into a resource field.
    ///
    /// # Errors
    ///
    /// Fails if the resource is absent.
    pub fn update_resource(
        &self,
        name: &str,
        field: ResourceField,
        raw: &str,
    ) -> Result<Self, CollectionError> {
        Ok(Self {
            resources: self.resources.update_field(name, &field, raw)?,
            ..self.clone()
        })
    }

    /// Sets a provider parameter of a resource, adding the key if needed.
    ///
    /// An existing key keeps its JSON type; see [`ParameterInput`].
    ///
    /// # Errors
    ///
    /// Fails if the resource is absent or the key is blank.
    pub fn set_parameter(
        &self,
        resource: &str,
        provider: Provider,
        key: &str,
        raw: &str,
    ) -> Result<Self, CollectionError> {
        let current = self
            .resources
            .get(resource)
            .ok_or_else(|| CollectionError::NotFound(resource.to_string()))?;
        let block = current.params(provider);
        let block = if block.contains(key) {
            block.update_field(key, &(), raw)?
        } else {
            block.add(key, ParameterInput::from_raw(raw))?
        };

        let resources = self
            .resources
            .update_with(resource, |fields| *fields.params_mut(provider) = block)?;
        Ok(Self {
            resources,
            ..self.clone()
        })
    }

    /// Removes a provider parameter from a resource.
    ///
    /// # Errors
    ///
    /// Fails if the resource is absent.
    pub fn delete_parameter(
        &self,
        resource: &str,
        provider: Provider,
        key: &str,
    ) -> Result<Self, CollectionError> {
        let resources = self.resources.update_with(resource, |fields| {
            let block = fields.params(provider).delete(key);
            *fields.params_mut(provider) = block;
        })?;
        Ok(Self {
            resources,
            ..self.clone()
        })
    }

    /// Appends a subpolicy.
    ///
    /// # Errors
    ///
    /// Fails if the name is blank or already used by another subpolicy.
    pub fn add_subpolicy(&self, name: &str, fields: SubpolicyFields) -> Result<Self, CollectionError> {
        Ok(Self {
            subpolicies: self.subpolicies.add(name, fields)?,
            ..self.clone()
        })
    }

    /// Renames a subpolicy in place.
    ///
    /// # Errors
    ///
    /// Fails if `old` is absent or `new` is blank or taken.
    pub fn rename_subpolicy(&self, old: &str, new: &str) -> Result<Self, CollectionError> {
        Ok(Self {
            subpolicies: self.subpolicies.rename(old, new)?,
            ..self.clone()
        })
    }

    /// Removes a subpolicy. Absent names leave the state unchanged.
    #[must_use]
    pub fn delete_subpolicy(&self, name: &str) -> Self {
        Self {
            subpolicies: self.subpolicies.delete(name),
            ..self.clone()
        }
    }

    /// Stores raw text into a subpolicy field.
    ///
    /// # Errors
    ///
    /// Fails if the subpolicy is absent.
    pub fn update_subpolicy(
        &self,
        name: &str,
        field: SubpolicyField,
        raw: &str,
    ) -> Result<Self, CollectionError> {
        Ok(Self {
            subpolicies: self.subpolicies.update_field(name, &field, raw)?,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(ratio: f64, scale_in: &str, scale_out: &str) -> ResourceFields {
        ResourceFields {
            scale_in_cooldown: scale_in.to_string(),
            scale_out_cooldown: scale_out.to_string(),
            ratio: NumericInput::Value(ratio),
            ..ResourceFields::default()
        }
    }

    fn state() -> PolicyUiState {
        let mut resources = NamedCollection::new();
        resources.insert_or_replace("web".to_string(), resource(1.0, "60s", "120s"));
        PolicyUiState {
            checking_frequency: "1m".to_string(),
            ensembler: "conservative".to_string(),
            resources,
            subpolicies: NamedCollection::new(),
            extra: Map::new(),
        }
    }

    fn resource_names(state: &PolicyUiState) -> Vec<&str> {
        state.resources.names().collect()
    }

    #[test]
    fn add_appends_after_existing_resource() {
        let next = state()
            .add_resource("batch", ResourceFields::with_defaults())
            .unwrap();
        assert_eq!(resource_names(&next), ["web", "batch"]);
    }

    #[test]
    fn rename_keeps_position() {
        let next = state()
            .add_resource("batch", ResourceFields::default())
            .and_then(|s| s.rename_resource("web", "frontend"))
            .unwrap();
        assert_eq!(resource_names(&next), ["frontend", "batch"]);
        assert!(next.resources.get("web").is_none());
    }

    #[test]
    fn rename_onto_taken_name_is_rejected() {
        let before = state()
            .add_resource("batch", ResourceFields::default())
            .and_then(|s| s.rename_resource("web", "frontend"))
            .unwrap();
        let result = before.rename_resource("batch", "frontend");
        assert_eq!(
            result,
            Err(CollectionError::Duplicate("frontend".to_string()))
        );
        assert_eq!(resource_names(&before), ["frontend", "batch"]);
    }

    #[test]
    fn rename_cascades_into_subpolicies() {
        let next = state()
            .add_subpolicy(
                "CoreRatio",
                SubpolicyFields {
                    managed_resources: vec!["web".to_string(), "other".to_string()],
                    ..SubpolicyFields::default()
                },
            )
            .and_then(|s| s.rename_resource("web", "frontend"))
            .unwrap();
        assert_eq!(
            next.subpolicies.get("CoreRatio").unwrap().managed_resources,
            ["frontend", "other"]
        );
    }

    #[test]
    fn rename_onto_listed_name_leaves_one_reference() {
        let next = state()
            .add_subpolicy(
                "CoreRatio",
                SubpolicyFields {
                    managed_resources: vec![
                        "web".to_string(),
                        "batch".to_string(),
                        "frontend".to_string(),
                    ],
                    ..SubpolicyFields::default()
                },
            )
            .and_then(|s| s.rename_resource("web", "frontend"))
            .unwrap();
        assert_eq!(
            next.subpolicies.get("CoreRatio").unwrap().managed_resources,
            ["frontend", "batch"]
        );
    }

    #[test]
    fn delete_strips_subpolicy_references() {
        let next = state()
            .add_subpolicy(
                "OfficeHour",
                SubpolicyFields {
                    managed_resources: vec!["web".to_string()],
                    ..SubpolicyFields::default()
                },
            )
            .unwrap()
            .delete_resource("web");
        assert!(next.resources.is_empty());
        assert!(next
            .subpolicies
            .get("OfficeHour")
            .unwrap()
            .managed_resources
            .is_empty());
    }

    #[test]
    fn delete_absent_resource_is_noop() {
        let before = state();
        assert_eq!(before.delete_resource("missing"), before);
    }

    #[test]
    fn ratio_keeps_transient_text() {
        let next = state()
            .update_resource("web", ResourceField::Ratio, "1.")
            .unwrap();
        let ratio = &next.resources.get("web").unwrap().ratio;
        assert_eq!(ratio, &NumericInput::Pending("1.".to_string()));
        assert_eq!(ratio.to_string(), "1.");
    }

    #[test]
    fn update_missing_resource_fails() {
        let result = state().update_resource("nope", ResourceField::ScaleInCooldown, "5m");
        assert_eq!(result, Err(CollectionError::NotFound("nope".to_string())));
    }

    #[test]
    fn numeric_input_coercion() {
        assert!((NumericInput::Pending("2.5".to_string()).coerce() - 2.5).abs() < f64::EPSILON);
        assert!((NumericInput::Pending(" 3 ".to_string()).coerce() - 3.0).abs() < f64::EPSILON);
        assert!(NumericInput::Pending(String::new()).coerce().abs() < f64::EPSILON);
        assert!(NumericInput::Pending("abc".to_string()).coerce().abs() < f64::EPSILON);
        assert!(!NumericInput::Pending("inf".to_string()).is_valid());
        assert!(NumericInput::Value(4.0).is_valid());
    }

    fn nomad_value(state: &PolicyUiState, key: &str) -> Option<Value> {
        state
            .resources
            .get("web")
            .and_then(|fields| fields.nomad_params.get(key))
            .map(ParameterInput::to_value)
    }

    #[test]
    fn new_parameters_parse_as_literals() {
        let next = state()
            .set_parameter("web", Provider::Nomad, "MaxCount", "10")
            .and_then(|s| s.set_parameter("web", Provider::Nomad, "JobName", "web-job"))
            .and_then(|s| s.set_parameter("web", Provider::Ec2, "Region", "ap-southeast-1"))
            .unwrap();
        let fields = next.resources.get("web").unwrap();
        assert_eq!(nomad_value(&next, "MaxCount"), Some(Value::from(10)));
        assert_eq!(nomad_value(&next, "JobName"), Some(Value::from("web-job")));
        assert_eq!(
            fields.ec2_params.get("Region"),
            Some(&ParameterInput::Value(Value::from("ap-southeast-1")))
        );

        let next = next.delete_parameter("web", Provider::Nomad, "MaxCount").unwrap();
        assert!(!next.resources.get("web").unwrap().nomad_params.contains("MaxCount"));
    }

    #[test]
    fn string_parameter_stays_string() {
        let next = state()
            .set_parameter("web", Provider::Nomad, "JobName", "web-job")
            .and_then(|s| s.set_parameter("web", Provider::Nomad, "JobName", "2024"))
            .unwrap();
        assert_eq!(nomad_value(&next, "JobName"), Some(Value::from("2024")));
    }

    #[test]
    fn numeric_parameter_keeps_text_until_sent() {
        let next = state()
            .set_parameter("web", Provider::Nomad, "MaxCount", "5")
            .and_then(|s| s.set_parameter("web", Provider::Nomad, "MaxCount", "1."))
            .unwrap();
        let input = next.resources.get("web").unwrap().nomad_params.get("MaxCount");
        assert_eq!(
            input,
            Some(&ParameterInput::Number {
                raw: "1.".to_string(),
                integer: true
            })
        );
        assert_eq!(input.map(ToString::to_string).as_deref(), Some("1."));
        assert_eq!(nomad_value(&next, "MaxCount"), Some(Value::from(1)));

        let next = next
            .set_parameter("web", Provider::Nomad, "MaxCount", "lots")
            .unwrap();
        assert_eq!(nomad_value(&next, "MaxCount"), Some(Value::from(0)));
    }

    #[test]
    fn fractional_parameter_stays_fractional() {
        let next = state()
            .set_parameter("web", Provider::Ec2, "Weight", "0.5")
            .and_then(|s| s.set_parameter("web", Provider::Ec2, "Weight", "2"))
            .unwrap();
        let input = next.resources.get("web").unwrap().ec2_params.get("Weight").unwrap();
        assert_eq!(input.to_value(), Value::from(2.0));
    }

    #[test]
    fn template_parameters_keep_their_types() {
        let next = state()
            .add_resource("batch", ResourceFields::with_defaults())
            .and_then(|s| s.set_parameter("batch", Provider::Nomad, "JobName", "42"))
            .and_then(|s| s.set_parameter("batch", Provider::Nomad, "MinCount", "3"))
            .unwrap();
        let params = &next.resources.get("batch").unwrap().nomad_params;
        assert_eq!(params.get("JobName").map(ParameterInput::to_value), Some(Value::from("42")));
        assert_eq!(params.get("MinCount").map(ParameterInput::to_value), Some(Value::from(3)));
    }

    #[test]
    fn managed_resources_split_on_commas() {
        let next = state()
            .add_subpolicy("CoreRatio", SubpolicyFields::default())
            .and_then(|s| {
                s.update_subpolicy("CoreRatio", SubpolicyField::ManagedResources, "web, batch,,")
            })
            .unwrap();
        assert_eq!(
            next.subpolicies.get("CoreRatio").unwrap().managed_resources,
            ["web", "batch"]
        );
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("ratio".parse::<ResourceField>().unwrap(), ResourceField::Ratio);
        assert_eq!("EC2".parse::<Provider>().unwrap(), Provider::Ec2);
        assert!(matches!(
            "bogus".parse::<SubpolicyField>(),
            Err(Error::UnknownField(_))
        ));
    }
}
