use std::io::{self, Write};
use std::path::Path;

use clap::{Args, Subcommand};

use crate::config::{AppConfig, StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration and the values in effect.
    Show,
}

pub fn run(workspace_root: &Path, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(workspace_root),
        ConfigCommand::Show => run_show(workspace_root),
    }
}

fn run_init(workspace_root: &Path) -> AppResult<()> {
    let mut cfg = StoredConfig::load(workspace_root)?;

    println!("Configuring patchstats for {}.", workspace_root.display());
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Relative paths are resolved against this directory.");
    println!();

    apply_prompt(
        "Patches root (one subdirectory per project)",
        &mut cfg.patches_root,
    )?;
    apply_prompt("Per-project patches directory name", &mut cfg.patches_dir)?;
    apply_prompt("Patch file suffix", &mut cfg.patch_suffix)?;
    apply_prompt("Patch report CSV", &mut cfg.patch_report)?;
    apply_prompt("Takes JSON input", &mut cfg.takes_input)?;
    apply_prompt("Takes report CSV", &mut cfg.takes_report)?;

    // Reject values that would make every later run fail.
    AppConfig::resolve(workspace_root, &cfg, |_| None)?;
    cfg.save(workspace_root)?;

    println!(
        "\nConfiguration saved to {}",
        config_file_path(workspace_root).display()
    );
    Ok(())
}

fn run_show(workspace_root: &Path) -> AppResult<()> {
    let cfg = StoredConfig::load(workspace_root)?;
    let effective = AppConfig::load(workspace_root)?;

    println!(
        "Configuration file: {}",
        config_file_path(workspace_root).display()
    );
    println!("Patches root: {}", display_value(&cfg.patches_root));
    println!("Patches directory: {}", display_value(&cfg.patches_dir));
    println!("Patch suffix: {}", display_value(&cfg.patch_suffix));
    println!("Patch report: {}", display_value(&cfg.patch_report));
    println!("Takes input: {}", display_value(&cfg.takes_input));
    println!("Takes report: {}", display_value(&cfg.takes_report));
    println!(
        "Read concurrency: {}",
        display_value(&cfg.read_concurrency.map(|n| n.to_string()))
    );
    println!();
    println!("In effect (after environment overrides):");
    println!("  patches root: {}", effective.patches_root.display());
    println!("  patches directory: {}", effective.patches_dir);
    println!("  patch suffix: {}", effective.patch_suffix);
    println!("  patch report: {}", effective.patch_report.display());
    println!("  takes input: {}", effective.takes_input.display());
    println!("  takes report: {}", effective.takes_report.display());
    println!("  read concurrency: {}", effective.read_concurrency);

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>) -> AppResult<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let action = prompt(&mut input, &mut io::stdout(), field, target.as_deref())?;
    action.apply(target);
    Ok(())
}

fn prompt(
    input: &mut impl io::BufRead,
    output: &mut impl Write,
    field: &str,
    current: Option<&str>,
) -> AppResult<PromptAction> {
    match current {
        Some(value) => write!(output, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(output, "{field} (Enter to skip): ")?,
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(PromptAction::parse(&line))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }

    fn apply(self, target: &mut Option<String>) {
        match self {
            PromptAction::Keep => {}
            PromptAction::Clear => *target = None,
            PromptAction::Set(value) => *target = Some(value),
        }
    }
}
