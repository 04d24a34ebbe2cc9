mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, check, init, show, ApplyArgs, CheckArgs, InitArgs, ShowArgs};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Wikiedit CLI - inspect and edit page front matter
#[derive(Parser, Debug)]
#[command(name = "wikiedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default wikiedit.config.json
    Init(InitArgs),

    /// Print front matter as the editable tree
    Show(ShowArgs),

    /// Apply a list of mutations to a front-matter file
    Apply(ApplyArgs),

    /// Check that files survive a load/save cycle unchanged
    Check(CheckArgs),
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config for `command`. `init` never reads the existing file, so a broken
/// one can still be overwritten.
fn load_config(command: &Command, cwd: &str) -> anyhow::Result<Config> {
    match command {
        Command::Init(_) => Ok(Config::default()),
        _ => Config::load(cwd),
    }
}

fn run(cli: Cli, cwd: &str) -> anyhow::Result<()> {
    let config = load_config(&cli.command, cwd)?;
    init_logging(&config);

    match cli.command {
        Command::Init(args) => init(args, cwd),
        Command::Show(args) => show(args, cwd),
        Command::Apply(args) => apply(args, &config.editor, cwd),
        Command::Check(args) => check(args, cwd),
    }
}

fn main() {
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli, &cwd) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG_NAME;

    #[test]
    fn test_init_ignores_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();

        let cli = Cli::parse_from(["wikiedit", "init", "--force"]);
        assert!(load_config(&cli.command, &cwd).is_ok());
        let Command::Init(args) = cli.command else {
            panic!("expected init command");
        };
        init(args, &cwd).unwrap();
        assert_eq!(Config::load(&cwd).unwrap().log_level, "warn");

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();
        let show = Cli::parse_from(["wikiedit", "show", "page.json"]);
        assert!(load_config(&show.command, &cwd).is_err());
    }
}
