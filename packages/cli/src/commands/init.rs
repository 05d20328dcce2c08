use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use revise_buffer::{BufferConfig, ReentrantPolicy};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Maximum undo levels (0 = unlimited)
    #[arg(short, long, default_value = "0")]
    pub max_levels: usize,

    /// Behavior when a session is opened while another is active (reject, abandon, auto-commit)
    #[arg(short, long, default_value = "reject")]
    pub reentrant: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let reentrant = parse_policy(&args.reentrant)?;

    let config = Config {
        buffer: BufferConfig::default()
            .with_max_levels(args.max_levels)
            .with_reentrant(reentrant),
        ..Config::default()
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Write a script with a model and steps");
    println!("  2. Run: revise replay script.json (see demos/batch.json)");

    Ok(())
}

fn parse_policy(value: &str) -> Result<ReentrantPolicy> {
    match value {
        "reject" => Ok(ReentrantPolicy::Reject),
        "abandon" => Ok(ReentrantPolicy::Abandon),
        "auto-commit" => Ok(ReentrantPolicy::AutoCommit),
        other => Err(anyhow::anyhow!(
            "Invalid reentrant policy: {}. Use: reject, abandon, or auto-commit",
            other
        )),
    }
}
