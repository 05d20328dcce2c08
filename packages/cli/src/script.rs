//! Scripted edit sessions
//!
//! A script seeds a JSON model and lists the calls a UI would make against
//! the edit buffer. Replaying it yields the final model and history.

use anyhow::{bail, Context, Result};
use revise_buffer::{BufferConfig, EditBuffer, MapModel, Model};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Initial field values
    #[serde(default)]
    pub model: Map<String, Value>,

    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Begin { label: String },

    /// Write `value`, reading `before` from the model like a widget would.
    /// The path must already exist; use `record` to introduce new fields.
    Set { path: String, value: Value },

    Record { path: String, before: Value, after: Value },

    End,
    Cancel,
    Undo,
    Redo,
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Begin { .. } => "begin",
            Step::Set { .. } => "set",
            Step::Record { .. } => "record",
            Step::End => "end",
            Step::Cancel => "cancel",
            Step::Undo => "undo",
            Step::Redo => "redo",
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        let script = serde_json::from_str(&content)
            .with_context(|| format!("Invalid script {}", path.display()))?;
        Ok(script)
    }
}

/// Outcome of a replayed script
#[derive(Debug)]
pub struct Replay {
    pub model: MapModel<Value>,
    pub buffer: EditBuffer<Value>,
}

pub fn run(script: Script, config: BufferConfig, strict: bool) -> Result<Replay> {
    debug!(steps = script.steps.len(), strict, "Replaying script");

    let mut model = MapModel::from_fields(script.model);
    if strict {
        model = model.strict();
    }
    let mut buffer = EditBuffer::with_config(config);

    for (idx, step) in script.steps.into_iter().enumerate() {
        let name = step.name();
        apply_step(&mut buffer, &mut model, step)
            .with_context(|| format!("Step {} ({}) failed", idx + 1, name))?;
    }

    Ok(Replay { model, buffer })
}

fn apply_step(
    buffer: &mut EditBuffer<Value>,
    model: &mut MapModel<Value>,
    step: Step,
) -> Result<()> {
    match step {
        Step::Begin { label } => buffer.begin_edit(model, label)?,
        Step::Set { path, value } => {
            let Some(before) = model.get_value(&path) else {
                bail!(
                    "Cannot set unknown path '{}'; use a record step with an explicit before",
                    path
                );
            };
            buffer.record(path, before, value);
        }
        Step::Record {
            path,
            before,
            after,
        } => buffer.record(path, before, after),
        Step::End => {
            buffer.end_edit(model)?;
        }
        Step::Cancel => {
            buffer.cancel_edit();
        }
        Step::Undo => {
            buffer.undo(model)?;
        }
        Step::Redo => {
            buffer.redo(model)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Script {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let script = parse(json!({
            "model": { "name": "Alice" },
            "steps": [
                { "op": "begin", "label": "set name" },
                { "op": "set", "path": "name", "value": "Bob" },
                { "op": "end" },
                { "op": "undo" }
            ]
        }));

        assert_eq!(script.model["name"], "Alice");
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[0],
            Step::Begin {
                label: "set name".to_string()
            }
        );
        assert_eq!(script.steps[3], Step::Undo);
    }

    #[test]
    fn test_replay_set_name() {
        let script = parse(json!({
            "model": { "name": "Alice" },
            "steps": [
                { "op": "begin", "label": "set name" },
                { "op": "set", "path": "name", "value": "Bob" },
                { "op": "end" },
                { "op": "undo" },
                { "op": "redo" }
            ]
        }));

        let replay = run(script, BufferConfig::default(), false).unwrap();
        assert_eq!(replay.model.get("name"), Some(&json!("Bob")));
        assert_eq!(replay.buffer.undo_levels(), 1);
        assert_eq!(replay.buffer.redo_levels(), 0);
    }

    #[test]
    fn test_replay_batch_then_undo() {
        let script = parse(json!({
            "model": { "a": 1, "b": 10 },
            "steps": [
                { "op": "begin", "label": "batch" },
                { "op": "record", "path": "a", "before": 1, "after": 2 },
                { "op": "record", "path": "b", "before": 10, "after": 20 },
                { "op": "record", "path": "a", "before": 2, "after": 3 },
                { "op": "end" },
                { "op": "undo" }
            ]
        }));

        let replay = run(script, BufferConfig::default(), false).unwrap();
        assert_eq!(replay.model.get("a"), Some(&json!(1)));
        assert_eq!(replay.model.get("b"), Some(&json!(10)));
        assert_eq!(replay.buffer.redo_label(), Some("batch"));
        assert_eq!(replay.buffer.peek_redo().map(|c| c.leaf_count()), Some(2));
    }

    #[test]
    fn test_set_on_unknown_path_is_rejected() {
        let script = parse(json!({
            "model": { "a": 1 },
            "steps": [
                { "op": "begin", "label": "add" },
                { "op": "set", "path": "fresh", "value": true },
                { "op": "end" },
                { "op": "undo" }
            ]
        }));

        let err = run(script, BufferConfig::default(), false).unwrap_err();
        assert_eq!(err.to_string(), "Step 2 (set) failed");
        assert!(format!("{:#}", err).contains("unknown path 'fresh'"));
    }

    #[test]
    fn test_undo_of_set_restores_fields_exactly() {
        let script = parse(json!({
            "model": { "a": 1, "b": "x" },
            "steps": [
                { "op": "begin", "label": "edit" },
                { "op": "set", "path": "a", "value": 2 },
                { "op": "set", "path": "b", "value": "y" },
                { "op": "set", "path": "a", "value": 3 },
                { "op": "end" },
                { "op": "undo" }
            ]
        }));

        let replay = run(script, BufferConfig::default(), false).unwrap();
        let fields = replay.model.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["a"], json!(1));
        assert_eq!(fields["b"], json!("x"));
    }

    #[test]
    fn test_cancel_leaves_model_untouched() {
        let script = parse(json!({
            "model": { "a": 1 },
            "steps": [
                { "op": "begin", "label": "draft" },
                { "op": "set", "path": "a", "value": 5 },
                { "op": "cancel" },
                { "op": "end" }
            ]
        }));

        let replay = run(script, BufferConfig::default(), false).unwrap();
        assert_eq!(replay.model.get("a"), Some(&json!(1)));
        assert!(!replay.buffer.can_undo());
    }

    #[test]
    fn test_error_names_failing_step() {
        let script = parse(json!({
            "model": { "a": 1 },
            "steps": [
                { "op": "begin", "label": "bad" },
                { "op": "record", "path": "missing", "before": null, "after": 1 },
                { "op": "end" }
            ]
        }));

        let err = run(script, BufferConfig::default(), true).unwrap_err();
        assert_eq!(err.to_string(), "Step 3 (end) failed");
    }

    #[test]
    fn test_reentrant_begin_is_an_error_by_default() {
        let script = parse(json!({
            "steps": [
                { "op": "begin", "label": "one" },
                { "op": "begin", "label": "two" }
            ]
        }));

        let err = run(script, BufferConfig::default(), false).unwrap_err();
        assert!(format!("{:#}", err).contains("\"one\" is already active"));
    }
}
