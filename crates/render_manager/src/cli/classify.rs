//! Classify command - check names against the naming convention

use crate::cli::config::load_config;
use crate::cli::output::print_table_colored;
use comfy_table::Color;
use render_manager::layers::{classify, LayerError, TokenConfig};
use serde::Serialize;

/// Arguments for the classify command
#[derive(Debug)]
pub struct ClassifyArgs {
    pub names: Vec<String>,
    pub json: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Classification {
    pub name: String,
    pub valid: bool,
    pub key: Option<String>,
    pub prefix: Option<String>,
    pub role: Option<String>,
    pub pass: Option<String>,
    pub reason: Option<String>,
}

pub fn classify_name(name: &str, tokens: &TokenConfig) -> Classification {
    match classify(name, tokens) {
        Ok(layer) => Classification {
            name: name.to_string(),
            valid: true,
            key: Some(layer.key),
            prefix: Some(layer.prefix),
            role: Some(layer.role),
            pass: Some(layer.pass),
            reason: None,
        },
        Err(err) => {
            let reason = match err {
                LayerError::InvalidToken { reason, .. } => reason.to_string(),
                other => other.to_string(),
            };
            Classification {
                name: name.to_string(),
                valid: false,
                key: None,
                prefix: None,
                role: None,
                pass: None,
                reason: Some(reason),
            }
        }
    }
}

pub fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let results: Vec<Classification> = args
        .names
        .iter()
        .map(|name| classify_name(name, &config.tokens))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let dash = || "---".to_string();
    print_table_colored(
        &["Name", "Valid", "Key", "Role", "Pass", "Reason"],
        results
            .into_iter()
            .map(|r| {
                let (valid, color) = if r.valid {
                    ("yes", Color::Green)
                } else {
                    ("no", Color::Red)
                };
                vec![
                    (r.name, None),
                    (valid.to_string(), Some(color)),
                    (r.key.unwrap_or_else(dash), None),
                    (r.role.unwrap_or_else(dash), None),
                    (r.pass.unwrap_or_else(dash), None),
                    (r.reason.unwrap_or_default(), None),
                ]
            })
            .collect(),
    );
    Ok(())
}
