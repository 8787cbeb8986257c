// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates cluster names and backend names while parsing.

use serde::Deserialize;

use crate::history::Backend;
use crate::types::ClusterName;

pub fn deserialize_cluster_name<'de, D>(deserializer: D) -> Result<Option<ClusterName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| ClusterName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_backend<'de, D>(deserializer: D) -> Result<Backend, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
