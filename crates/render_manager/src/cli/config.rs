//! Config command - shows resolved paths and settings

use crate::cli::error::HelpfulError;
use render_manager::config::{config_path, logs_dir, render_manager_home, RenderManagerConfig};

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Show resolved settings in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Resolve the configuration, turning parse failures into a helpful error.
pub fn load_config() -> anyhow::Result<RenderManagerConfig> {
    RenderManagerConfig::resolve()
        .map_err(|e| HelpfulError::invalid_config(&config_path(), &e.to_string()).into())
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let home = render_manager_home();
    let config_file = config_path();
    let logs = logs_dir();
    let config = load_config()?;
    let snapshot_dir = config.farm.snapshot_dir();

    if args.json {
        let payload = serde_json::json!({
            "home": home.to_string_lossy(),
            "config": {
                "path": config_file.to_string_lossy(),
                "exists": config_file.exists(),
            },
            "logs": {
                "path": logs.to_string_lossy(),
                "exists": logs.exists(),
            },
            "payload_extension": config.payload_extension,
            "cache_ttl_secs": config.cache_ttl_secs,
            "farm": {
                "command": config.farm.command.to_string_lossy(),
                "plugin": config.farm.plugin,
                "statuses": config.farm.statuses,
                "snapshot_dir": snapshot_dir.to_string_lossy(),
            },
            "tokens": config.tokens,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("RENDER MANAGER CONFIGURATION");
        println!("============================");
        println!();
        println!("Home:      {}", home.display());
        println!(
            "Config:    {} ({})",
            config_file.display(),
            if config_file.exists() { "exists" } else { "defaults" }
        );
        println!("Logs:      {}", logs.display());
        println!();
        println!("Payload:   .{}", config.payload_extension);
        println!("Cache TTL: {}s", config.cache_ttl_secs);
        println!();
        println!("Farm command:  {}", config.farm.command.display());
        println!("Farm plugin:   {}", config.farm.plugin);
        println!("Farm statuses: {}", config.farm.statuses.join(", "));
        println!("Snapshots:     {}", snapshot_dir.display());
        println!();
        println!("Prefixes:         {}", config.tokens.prefixes.join(", "));
        println!("Version prefixes: {}", config.tokens.version_prefixes.join(", "));
        println!("Roles:            {}", config.tokens.roles.join(", "));
        println!("Passes:           {}", config.tokens.passes.join(", "));
    }

    Ok(())
}
