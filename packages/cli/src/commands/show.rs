use super::{read_json, resolve};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use wikiedit_editor::{decode, editor_rows, DocumentStats, EditorRow, RowContent, ScalarKind};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Front-matter JSON file
    pub file: PathBuf,

    /// Print rows as JSON instead of an indented tree
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs, cwd: &str) -> Result<()> {
    let path = resolve(cwd, &args.file);
    let wire = read_json(&path)?;
    let doc = decode(Some(&wire));
    let rows = editor_rows(&doc);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!("{}", render_row(row));
    }

    let stats = DocumentStats::collect(&doc);
    println!();
    println!(
        "{} {} leaves, {} lists ({} items), {} sections, depth {}",
        "Summary:".bright_blue().bold(),
        stats.leaves,
        stats.lists,
        stats.list_items,
        stats.sections,
        stats.max_depth
    );
    Ok(())
}

/// One line of the indented tree
pub(crate) fn render_row(row: &EditorRow) -> String {
    let indent = "  ".repeat(row.depth);
    match &row.content {
        RowContent::Leaf { value, kind } => {
            let value = match kind {
                ScalarKind::String => format!("{:?}", value),
                ScalarKind::Null if value.is_empty() => "null".to_string(),
                _ => value.clone(),
            };
            format!("{}{}: {}", indent, row.key.bold(), value)
        }
        RowContent::List { items } => {
            let items: Vec<String> = items.iter().map(|item| format!("{:?}", item)).collect();
            format!("{}{}: [{}]", indent, row.key.bold(), items.join(", "))
        }
        RowContent::Section { len } => {
            format!("{}{}: {}", indent, row.key.bold(), format!("({} fields)", len).dimmed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_rows() {
        colored::control::set_override(false);

        let doc = decode(Some(&json!({
            "title": "Inventory Item",
            "inventory": { "items": ["a", ""] },
            "count": 2,
            "owner": null
        })));
        let lines: Vec<String> = editor_rows(&doc).iter().map(render_row).collect();

        assert_eq!(
            lines,
            vec![
                r#"title: "Inventory Item""#.to_string(),
                "inventory: (1 fields)".to_string(),
                r#"  items: ["a", ""]"#.to_string(),
                "count: 2".to_string(),
                "owner: null".to_string(),
            ]
        );
    }

    #[test]
    fn test_show_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.json"), r#"{ "title": "x" }"#).unwrap();

        let result = show(
            ShowArgs {
                file: PathBuf::from("page.json"),
                json: true,
            },
            &dir.path().display().to_string(),
        );
        assert!(result.is_ok());
    }
}
