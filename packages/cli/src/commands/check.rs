use super::{read_json, resolve};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use wikiedit_editor::{decode, encode};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Front-matter JSON files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let mut failures = 0;

    for file in &args.files {
        let path = resolve(cwd, file);
        let wire = read_json(&path)?;
        let mismatched = round_trip_mismatches(&wire);

        if mismatched.is_empty() {
            println!("  {} {}", "✓".green(), file.display());
        } else {
            failures += 1;
            println!(
                "  {} {} - changed on save: {}",
                "✗".red(),
                file.display(),
                mismatched.join(", ")
            );
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} file(s) do not survive a round trip", failures));
    }
    Ok(())
}

/// Top-level keys whose value or position changes after decode → encode
pub(crate) fn round_trip_mismatches(wire: &Value) -> Vec<String> {
    let encoded = encode(&decode(Some(wire)));

    match (wire, &encoded) {
        (Value::Object(original), Value::Object(saved)) => {
            let saved_keys: Vec<&String> = saved.keys().collect();
            let mut keys: Vec<String> = original
                .iter()
                .enumerate()
                .filter(|(index, (key, value))| {
                    saved_keys.get(*index) != Some(key)
                        || saved.get(key.as_str()).map(Value::to_string) != Some(value.to_string())
                })
                .map(|(_, (key, _))| key.clone())
                .collect();
            keys.extend(saved.keys().filter(|key| !original.contains_key(*key)).cloned());
            keys
        }
        (original, _) if original.is_null() => Vec::new(),
        _ => vec!["<root>".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_front_matter_round_trips() {
        let wire = json!({
            "title": "Inventory Item",
            "count": 3,
            "tags": ["a", "b"],
            "meta": { "mixed": [1, "x"] }
        });
        assert!(round_trip_mismatches(&wire).is_empty());
    }

    #[test]
    fn test_non_object_root_is_reported() {
        assert_eq!(round_trip_mismatches(&json!(["a"])), vec!["<root>"]);
        assert!(round_trip_mismatches(&Value::Null).is_empty());
    }

    #[test]
    fn test_check_fails_for_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.json"), r#"{ "a": "b" }"#).unwrap();
        std::fs::write(dir.path().join("bad.json"), r#""just a string""#).unwrap();
        let cwd = dir.path().display().to_string();

        assert!(check(CheckArgs { files: vec![PathBuf::from("good.json")] }, &cwd).is_ok());
        assert!(check(CheckArgs { files: vec![PathBuf::from("bad.json")] }, &cwd).is_err());
    }
}
