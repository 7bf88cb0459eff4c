//! Latest version across grouped layers

use crate::layers::types::RenderLayer;
use std::collections::{BTreeMap, HashMap};

/// Layers grouped by role (`BG`, `FG`, ...).
pub type LayersByRole = BTreeMap<String, Vec<RenderLayer>>;

/// Group layers by their role token, keeping collection order inside a role.
pub fn group_by_role(layers: impl IntoIterator<Item = RenderLayer>) -> LayersByRole {
    let mut groups = LayersByRole::new();
    for layer in layers {
        groups
            .entry(layer.rol_main().to_string())
            .or_default()
            .push(layer);
    }
    groups
}

/// Highest integer version per layer name.
///
/// On equal versions the first layer seen wins. Results follow the order in
/// which each name first appears.
pub fn latest_across<'a, I>(layers: I) -> Vec<RenderLayer>
where
    I: IntoIterator<Item = &'a RenderLayer>,
{
    let mut latest: Vec<RenderLayer> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for layer in layers {
        match index.get(layer.name()) {
            Some(&slot) => {
                if layer.int_version() > latest[slot].int_version() {
                    latest[slot] = layer.clone();
                }
            }
            None => {
                index.insert(layer.name().to_string(), latest.len());
                latest.push(layer.clone());
            }
        }
    }
    latest
}

/// [`latest_across`] over every role group.
pub fn latest_in_groups(groups: &LayersByRole) -> Vec<RenderLayer> {
    latest_across(groups.values().flatten())
}

/// Every layer called `name`, highest version first. Equal versions keep
/// their collection order.
pub fn versions_of(groups: &LayersByRole, name: &str) -> Vec<RenderLayer> {
    let mut versions: Vec<RenderLayer> = groups
        .values()
        .flatten()
        .filter(|layer| layer.name() == name)
        .cloned()
        .collect();
    versions.sort_by(|a, b| b.int_version().cmp(&a.int_version()));
    versions
}
