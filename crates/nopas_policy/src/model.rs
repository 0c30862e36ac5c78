//! Server-side policy document.
//!
//! These types mirror the JSON exchanged with the policy service. Field names
//! on the wire follow the service (`CheckingFreq`, `N2CRatio`, ...). Fields
//! this crate does not know about are kept in `extra` and written back
//! unchanged.

use crate::collection::NamedCollection;
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider-specific scaling parameters, keyed by parameter name.
///
/// Values are JSON scalars owned by the provider; this crate passes them
/// through without interpreting them.
pub type ParameterBlock = NamedCollection<Value>;

/// Parameter keys understood by the Nomad provider.
pub const NOMAD_PARAMETER_KEYS: [&str; 5] =
    ["Address", "JobName", "NomadPath", "MinCount", "MaxCount"];

/// Parameter keys understood by the EC2 auto scaling provider.
pub const EC2_PARAMETER_KEYS: [&str; 4] = ["ScalingGroupName", "Region", "MinCount", "MaxCount"];

/// A complete autoscaling policy as stored by the policy service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDocument {
    /// How often the autoscaler evaluates the policy (duration expression).
    #[serde(rename = "CheckingFreq")]
    pub checking_frequency: String,
    /// Strategy used to combine subpolicy recommendations.
    #[serde(rename = "Ensembler")]
    pub ensembler: String,
    /// Managed compute resources, in display order.
    #[serde(rename = "Resources", default)]
    pub resources: Vec<ResourceRecord>,
    /// Subpolicies, in display order.
    #[serde(rename = "Subpolicies", default)]
    pub subpolicies: Vec<SubpolicyRecord>,
    /// Document fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named compute resource scaled across Nomad and EC2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceRecord {
    /// Unique resource name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Minimum wait after a scale-in.
    #[serde(rename = "ScaleInCooldown")]
    pub scale_in_cooldown: String,
    /// Minimum wait after a scale-out.
    #[serde(rename = "ScaleOutCooldown")]
    pub scale_out_cooldown: String,
    /// Nomad task count per EC2 instance.
    #[serde(rename = "N2CRatio")]
    pub ratio: f64,
    /// Nomad job parameters.
    #[serde(rename = "NomadParameters", default)]
    pub nomad_params: ParameterBlock,
    /// EC2 auto scaling group parameters.
    #[serde(rename = "EC2Parameters", default)]
    pub ec2_params: ParameterBlock,
    /// Resource fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named subpolicy recommending counts for a set of resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubpolicyRecord {
    /// Unique subpolicy name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Names of the resources this subpolicy manages.
    #[serde(rename = "ManagedResources", default)]
    pub managed_resources: Vec<String>,
    /// Subpolicy-specific settings.
    #[serde(rename = "Metadata", default)]
    pub metadata: Value,
    /// Subpolicy fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyDocument {
    /// Parses a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid policy document.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serializes the document to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds a parameter block holding every key in `keys`.
///
/// Count keys start at zero, everything else starts as an empty string.
pub fn parameter_template(keys: &[&str]) -> ParameterBlock {
    let mut block = ParameterBlock::new();
    for key in keys {
        let value = if key.ends_with("Count") {
            Value::from(0)
        } else {
            Value::String(String::new())
        };
        block.insert_or_replace((*key).to_string(), value);
    }
    block
}
