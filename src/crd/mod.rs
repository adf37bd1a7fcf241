//! # Custom Resource Definitions
//!
//! The `Paas` custom resource, as far as the webservice consumes it.
//!
//! Only the fields needed to validate encrypted secrets are modelled. Any other
//! field in an incoming manifest is ignored during deserialization.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Encrypted secrets keyed by repository or location, e.g.
/// `ssh://git@scm/some-repo.git`. Values are base64 RSA-OAEP ciphertexts.
pub type SshSecrets = BTreeMap<String, String>;

const API_VERSION: &str = "cpet.belastingdienst.nl/v1alpha1";
const KIND: &str = "Paas";

/// Paas Custom Resource Definition
///
/// A tenant's platform-as-a-service configuration.
///
/// # Example
///
/// ```yaml
/// apiVersion: cpet.belastingdienst.nl/v1alpha1
/// kind: Paas
/// metadata:
///   name: my-paas
/// spec:
///   sshSecrets:
///     ssh://git@scm/some-repo.git: <base64 ciphertext>
///   capabilities:
///     argocd:
///       enabled: true
///       sshSecrets:
///         ssh://git@scm/some-repo.git: <base64 ciphertext>
/// ```
#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "Paas",
    group = "cpet.belastingdienst.nl",
    version = "v1alpha1",
    shortname = "paas"
)]
#[serde(rename_all = "camelCase")]
pub struct PaasSpec {
    /// SSH secrets shared by all capabilities of this Paas
    #[serde(default, deserialize_with = "null_as_default")]
    pub ssh_secrets: SshSecrets,
    /// Capabilities by name. Iteration order carries no meaning.
    #[serde(default, deserialize_with = "capabilities_or_default")]
    pub capabilities: BTreeMap<String, PaasCapability>,
}

/// A named feature block within a Paas
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaasCapability {
    /// Whether the capability is enabled for this Paas
    #[serde(default)]
    pub enabled: bool,
    /// SSH secrets only used by this capability
    #[serde(default, deserialize_with = "null_as_default")]
    pub ssh_secrets: SshSecrets,
}

/// `null` deserializes to the empty value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A capability written as `name:` without a body is a disabled capability
/// without secrets
fn capabilities_or_default<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, PaasCapability>, D::Error>
where
    D: Deserializer<'de>,
{
    let capabilities: Option<BTreeMap<String, Option<PaasCapability>>> =
        Option::deserialize(deserializer)?;
    Ok(capabilities
        .unwrap_or_default()
        .into_iter()
        .map(|(name, capability)| (name, capability.unwrap_or_default()))
        .collect())
}

impl Paas {
    /// Build a Paas from a decoded manifest, filling in what an incoming
    /// request may leave out
    ///
    /// A missing or `null` `apiVersion`, `kind`, `metadata` or `spec` is
    /// replaced by its default, so a body without a spec is an empty Paas.
    ///
    /// # Errors
    ///
    /// Fails if `value` is not an object or a present field has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let value = match value {
            Value::Object(mut object) => {
                fill_missing(&mut object, "apiVersion", || Value::from(API_VERSION));
                fill_missing(&mut object, "kind", || Value::from(KIND));
                fill_missing(&mut object, "metadata", || Value::Object(Map::new()));
                fill_missing(&mut object, "spec", || Value::Object(Map::new()));
                Value::Object(object)
            }
            other => other,
        };
        serde_json::from_value(value)
    }
}

fn fill_missing(object: &mut Map<String, Value>, field: &str, default: impl FnOnce() -> Value) {
    let entry = object.entry(field).or_insert(Value::Null);
    if entry.is_null() {
        *entry = default();
    }
}

impl PaasSpec {
    /// Total number of encrypted secrets across the top level and all capabilities
    pub fn secret_count(&self) -> usize {
        self.ssh_secrets.len()
            + self
                .capabilities
                .values()
                .map(|capability| capability.ssh_secrets.len())
                .sum::<usize>()
    }
}
