//! Pipeline naming tokens
//!
//! Allow-lists that decide which folder and job names are render layers.
//! A layer name reads `<PREFIX>_<ROLE>[_<EXTRA>...]_<PASS>`, e.g.
//! `RND_BG_TECH` or `RND_BG_MAIN_BTY`; a version folder reads
//! `<VERSION PREFIX>_..._v<NNNN>`, e.g. `LGT_KAF_010_v0026`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token separator used by every pipeline name.
pub const DELIMITER: char = '_';

/// Token allow-lists, loaded from the `[tokens]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Valid first segment of a layer name.
    pub prefixes: Vec<String>,
    /// Valid first segment of a version folder or batch name.
    pub version_prefixes: Vec<String>,
    /// Valid second segment of a layer name.
    pub roles: Vec<String>,
    /// Valid last segment of a layer name, in display precedence order.
    pub passes: Vec<String>,
    /// AOVs kept per pass; passes missing here keep every AOV.
    pub pass_aovs: BTreeMap<String, Vec<String>>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        let mut pass_aovs = BTreeMap::new();
        pass_aovs.insert(
            "TECH".to_string(),
            strings(&["Z", "motionvector", "P", "Pref", "N", "UV"]),
        );
        pass_aovs.insert(
            "CRYPTO".to_string(),
            strings(&["crypto_asset", "crypto_material", "crypto_object"]),
        );

        Self {
            prefixes: strings(&["RND"]),
            version_prefixes: strings(&["LGT", "VFX"]),
            roles: strings(&["BG", "MG", "FG", "ALL", "VFX", "VOL"]),
            passes: strings(&["CRYPTO", "TECH", "BTY"]),
            pass_aovs,
        }
    }
}

impl TokenConfig {
    pub fn is_prefix(&self, token: &str) -> bool {
        self.prefixes.iter().any(|p| p == token)
    }

    pub fn is_role(&self, token: &str) -> bool {
        self.roles.iter().any(|r| r == token)
    }

    pub fn is_pass(&self, token: &str) -> bool {
        self.passes.iter().any(|p| p == token)
    }

    /// True when `token` starts with one of the version prefixes.
    pub fn is_valid_version_token(&self, token: &str) -> bool {
        self.version_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && token.starts_with(prefix.as_str()))
    }

    /// Display rank of a pass; unknown passes sort last.
    pub fn pass_precedence(&self, pass: &str) -> usize {
        self.passes
            .iter()
            .position(|p| p == pass)
            .unwrap_or(self.passes.len())
    }

    /// Keep only the AOVs allowed for `pass`. Passes without a filter keep all.
    pub fn filter_aovs(&self, pass: &str, aovs: Vec<String>) -> Vec<String> {
        match self.pass_aovs.get(pass) {
            Some(allowed) => aovs
                .into_iter()
                .filter(|aov| allowed.iter().any(|a| a == aov))
                .collect(),
            None => aovs,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
