use super::{read_json, resolve};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;
use wikiedit_editor::{Change, ChangeKind, EditSession, EditorConfig, EditorError, Mutation};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Front-matter JSON file to edit
    pub file: PathBuf,

    /// JSON array of mutations to apply in order
    pub mutations: PathBuf,

    /// Write the result here instead of back to FILE
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Abort on rejected edits (invalid/duplicate keys, stale indexes)
    #[arg(long)]
    pub strict: bool,
}

/// Counts reported after a run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub unchanged: usize,
    pub rejected: usize,
}

pub fn apply(args: ApplyArgs, config: &EditorConfig, cwd: &str) -> Result<()> {
    let file = resolve(cwd, &args.file);
    let wire = read_json(&file)?;
    let mutations: Vec<Mutation> = serde_json::from_value(read_json(&resolve(cwd, &args.mutations))?)
        .context("Mutations file must be a JSON array of mutations")?;

    let mut session = EditSession::new(file.display().to_string(), config.clone());
    session.open(Some(&wire));

    let summary = run(&mut session, mutations, args.strict)?;
    let output = serde_json::to_string_pretty(&session.snapshot()?)?;
    session.close();

    if args.stdout {
        println!("{}", output);
    } else {
        let target = args.out.map(|out| resolve(cwd, &out)).unwrap_or(file);
        fs::write(&target, output + "\n")
            .with_context(|| format!("Cannot write {}", target.display()))?;
        eprintln!(
            "{} {} applied, {} unchanged, {} rejected → {}",
            "✨".green(),
            summary.applied,
            summary.unchanged,
            summary.rejected,
            target.display()
        );
    }

    Ok(())
}

/// Apply mutations to an open session, reporting each outcome on stderr
pub(crate) fn run(
    session: &mut EditSession,
    mutations: Vec<Mutation>,
    strict: bool,
) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    for (index, mutation) in mutations.into_iter().enumerate() {
        let name = mutation.name();
        let target = mutation.target().to_string();

        match session.apply(mutation) {
            Ok(Some(change)) => {
                summary.applied += 1;
                eprintln!("  {} {}", "✓".green(), describe(&change));
            }
            Ok(None) => {
                summary.unchanged += 1;
                eprintln!("  {} {} {} (no change)", "·".dimmed(), name, target);
            }
            Err(EditorError::Mutation(e)) if e.is_recoverable() && !strict => {
                summary.rejected += 1;
                warn!(index, op = name, error = %e, "Rejected edit");
                eprintln!("  {} {} {} - {}", "✗".yellow(), name, target, e);
            }
            Err(e) => {
                return Err(anyhow!("Mutation #{} ({} {}) failed: {}", index, name, target, e));
            }
        }
    }

    Ok(summary)
}

fn describe(change: &Change) -> String {
    match &change.kind {
        ChangeKind::LeafSet => format!("set {}", change.path),
        ChangeKind::KeyRenamed { from, to } => format!("renamed {} → {} in {}", from, to, change.path),
        ChangeKind::ItemAdded { index } => format!("added {}[{}]", change.path, index),
        ChangeKind::ItemRemoved { index } => format!("removed {}[{}]", change.path, index),
        ChangeKind::ItemSet { index } => format!("set {}[{}]", change.path, index),
        ChangeKind::FieldAdded { .. } => format!("added {}", change.path),
        ChangeKind::FieldRemoved { .. } => format!("removed {}", change.path),
        ChangeKind::Restored => "restored document".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wikiedit_editor::{FieldKind, KeyPath};

    fn write(dir: &tempfile::TempDir, name: &str, value: serde_json::Value) {
        fs::write(dir.path().join(name), value.to_string()).unwrap();
    }

    #[test]
    fn test_apply_writes_result_in_place() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "page.json", json!({ "title": "x", "rename_me": { "total": "32" } }));
        write(
            &dir,
            "edits.json",
            json!([
                { "op": "setLeaf", "path": ["title"], "value": "Inventory Item" },
                { "op": "renameKey", "section": [], "old_key": "rename_me", "new_key": "totals" },
                { "op": "addField", "section": ["totals"], "kind": "array" }
            ]),
        );

        apply(
            ApplyArgs {
                file: PathBuf::from("page.json"),
                mutations: PathBuf::from("edits.json"),
                out: None,
                stdout: false,
                strict: false,
            },
            &EditorConfig::default(),
            &dir.path().display().to_string(),
        )
        .unwrap();

        let result: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("page.json")).unwrap())
                .unwrap();
        assert_eq!(
            result,
            json!({ "title": "Inventory Item", "totals": { "total": "32", "new_array": [] } })
        );
    }

    #[test]
    fn test_run_counts_outcomes() {
        let mut session = EditSession::new("test", EditorConfig::default());
        session.open(Some(&json!({ "a": "1", "b": "2" })));

        let summary = run(
            &mut session,
            vec![
                Mutation::SetLeaf {
                    path: KeyPath::from(["a"]),
                    value: "1".to_string(),
                },
                Mutation::RenameKey {
                    section: KeyPath::root(),
                    old_key: "b".to_string(),
                    new_key: "a".to_string(),
                },
                Mutation::AddField {
                    section: KeyPath::root(),
                    kind: FieldKind::Field,
                },
            ],
            false,
        )
        .unwrap();

        assert_eq!(
            summary,
            ApplySummary {
                applied: 1,
                unchanged: 1,
                rejected: 1
            }
        );
    }

    #[test]
    fn test_strict_run_stops_on_rejected_edit() {
        let mut session = EditSession::new("test", EditorConfig::default());
        session.open(Some(&json!({ "a": "1", "b": "2" })));

        let result = run(
            &mut session,
            vec![Mutation::RenameKey {
                section: KeyPath::root(),
                old_key: "b".to_string(),
                new_key: " ".to_string(),
            }],
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_caller_bug_always_fails() {
        let mut session = EditSession::new("test", EditorConfig::default());
        session.open(Some(&json!({ "a": "1" })));

        let result = run(
            &mut session,
            vec![Mutation::AddListItem {
                list: KeyPath::from(["a"]),
            }],
            false,
        );
        assert!(result.is_err());
    }
}
