use crate::config::Config;
use crate::script::{self, Replay, Script};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Script (.json) describing the model and edit steps
    pub script: PathBuf,

    /// Output format (text, json); defaults to the config value
    #[arg(short, long)]
    pub format: Option<String>,

    /// Reject writes to paths missing from the initial model
    #[arg(long)]
    pub strict: bool,

    /// Config file (defaults to revise.config.json in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(cwd)?,
    };
    let format = args.format.clone().unwrap_or_else(|| config.format.clone());

    let parsed = Script::load(&args.script)?;
    let steps = parsed.steps.len();
    let result = script::run(parsed, config.buffer.clone(), args.strict || config.strict)?;

    match format.as_str() {
        "json" => print_json(&result)?,
        "text" => print_text(&result, &args.script, steps),
        other => {
            return Err(anyhow::anyhow!(
                "Unknown output format: {}. Use: text or json",
                other
            ));
        }
    }

    Ok(())
}

fn print_json(result: &Replay) -> Result<()> {
    let output = json!({
        "model": result.model.fields(),
        "history": result.buffer.summary(),
        "top": {
            "undo": result.buffer.peek_undo(),
            "redo": result.buffer.peek_redo(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(result: &Replay, path: &Path, steps: usize) {
    println!("🔁 {} {}", "Replayed".green().bold(), path.display());
    println!("   Steps: {}", steps);
    println!();

    println!("{}", "Model".bright_white().bold());
    for (path, value) in result.model.fields() {
        println!("   {} = {}", path.cyan(), value);
    }
    println!();

    let summary = result.buffer.summary();
    println!("{}", "History".bright_white().bold());
    print_labels("Undo", &summary.undo);
    print_labels("Redo", &summary.redo);

    if let Some(label) = &summary.editing {
        println!();
        println!(
            "{} session \"{}\" was left open",
            "⚠️".yellow(),
            label.bright_white()
        );
    }
}

fn print_labels(title: &str, labels: &[String]) {
    if labels.is_empty() {
        println!("   {}: {}", title, "(empty)".dimmed());
        return;
    }

    println!("   {}:", title);
    for (depth, label) in labels.iter().enumerate() {
        println!("     {}. {}", depth + 1, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG_NAME;
    use std::fs;

    const NEW_FIELD_SCRIPT: &str = r#"{
        "model": { "a": 1 },
        "steps": [
            { "op": "begin", "label": "add" },
            { "op": "record", "path": "fresh", "before": null, "after": true },
            { "op": "end" }
        ]
    }"#;

    fn args(script: PathBuf) -> ReplayArgs {
        ReplayArgs {
            script,
            format: None,
            strict: false,
            config: None,
        }
    }

    fn write_script(dir: &Path) -> PathBuf {
        let path = dir.join("script.json");
        fs::write(&path, NEW_FIELD_SCRIPT).unwrap();
        path
    }

    #[test]
    fn test_replay_text_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let script = write_script(dir.path());

        replay(args(script.clone()), &cwd).unwrap();

        let json_args = ReplayArgs {
            format: Some("json".to_string()),
            ..args(script)
        };
        replay(json_args, &cwd).unwrap();
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let yaml_args = ReplayArgs {
            format: Some("yaml".to_string()),
            ..args(write_script(dir.path()))
        };
        let err = replay(yaml_args, &cwd).unwrap_err();
        assert!(err.to_string().contains("Unknown output format: yaml"));
    }

    #[test]
    fn test_format_falls_back_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "format": "xml" }"#).unwrap();

        let err = replay(args(write_script(dir.path())), &cwd).unwrap_err();
        assert!(err.to_string().contains("Unknown output format: xml"));
    }

    #[test]
    fn test_config_flag_overrides_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let script = write_script(dir.path());

        // Working directory config is lenient; the explicit one is strict
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "strict": false }"#).unwrap();
        let strict_config = dir.path().join("strict.json");
        fs::write(&strict_config, r#"{ "strict": true }"#).unwrap();

        replay(args(script.clone()), &cwd).unwrap();

        let override_args = ReplayArgs {
            config: Some(strict_config),
            ..args(script)
        };
        let err = replay(override_args, &cwd).unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown path: fresh"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let missing_args = ReplayArgs {
            config: Some(dir.path().join("nope.json")),
            ..args(write_script(dir.path()))
        };
        assert!(replay(missing_args, &cwd).is_err());
    }
}
