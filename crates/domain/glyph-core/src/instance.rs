use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Modloader {
    pub loader: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GameDescriptor {
    pub version: String,
    #[serde(default)]
    pub modloader: Modloader,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct JavaDescriptor {
    pub path: String,
    #[serde(default, alias = "args")]
    pub jvm_arguments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceSummary {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub game: GameDescriptor,
    #[serde(default)]
    pub java: JavaDescriptor,
}

impl InstanceSummary {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            game: GameDescriptor::default(),
            java: JavaDescriptor::default(),
        }
    }
}

/// Case-insensitive substring match on the instance name.
/// A blank search returns the whole collection in its original order.
pub fn filter_instances(instances: &[InstanceSummary], search: &str) -> Vec<InstanceSummary> {
    if search.trim().is_empty() {
        return instances.to_vec();
    }

    let needle = search.to_lowercase();
    instances
        .iter()
        .filter(|i| i.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
