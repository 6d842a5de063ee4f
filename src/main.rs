// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Onoma: template-driven rename proposals
//!
//! Command-line front end. It previews what a template would do to a set of
//! files; it never renames anything.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use onoma::case::CaseStyle;
use onoma::config::AppConfig;
use onoma::conflict::{detect_conflicts, ConflictReport};
use onoma::context::FileContext;
use onoma::diff::{diff_proposal, render_plain};
use onoma::grouped::GroupedPreview;
use onoma::proposal::{generate_proposals, RenameProposal};
use onoma::sanitize::{sanitize, Platform};
use onoma::template::{validate, Severity, ValidationResult};
use onoma::{OnomaError, Result};

/// Onoma CLI - template-driven rename previews
#[derive(Parser, Debug)]
#[command(name = "onoma")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(
    about = "Preview template-driven file renames with conflict detection",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "onoma.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a template for syntax errors, unknown placeholders and hints
    Validate {
        /// Template pattern or the name of a saved template
        pattern: String,
    },

    /// Show the names a template would give to files
    Preview {
        /// Template pattern or the name of a saved template
        pattern: String,

        /// Files or directories to preview
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Target platform for sanitization (overrides config)
        #[arg(long, value_parser = ["windows", "macos", "linux", "all"])]
        platform: Option<String>,

        /// Case style for the base name (overrides config)
        #[arg(long)]
        case: Option<String>,

        /// Folder pattern for organize mode, e.g. "{year}/{month}"
        #[arg(long)]
        folder: Option<String>,

        /// Root directory for organized folders
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Keep names exactly as substituted
        #[arg(long)]
        no_sanitize: bool,

        /// Drop dates and counters already in the original name
        #[arg(long)]
        strip_existing: bool,

        /// Skip checking the disk for existing files
        #[arg(long)]
        no_fs_check: bool,
    },

    /// Sanitize a single filename
    Sanitize {
        /// Filename to clean up
        name: String,

        /// Target platform (overrides config)
        #[arg(long, value_parser = ["windows", "macos", "linux", "all"])]
        platform: Option<String>,

        /// Maximum length in bytes (overrides config)
        #[arg(long)]
        max_length: Option<usize>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "onoma.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Load configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Validate { pattern }) => run_validate(&config, &pattern, &cli.format),
        Some(Commands::Preview {
            pattern,
            paths,
            recursive,
            platform,
            case,
            folder,
            dest,
            no_sanitize,
            strip_existing,
            no_fs_check,
        }) => {
            let mut config = config;
            if let Some(platform) = platform {
                config.sanitize.platform = parse_arg::<Platform>(&platform)?;
            }
            if let Some(case) = case {
                config.rename.case_style = parse_arg::<CaseStyle>(&case)?;
            }
            if folder.is_some() {
                config.rename.folder_pattern = folder;
            }
            if dest.is_some() {
                config.rename.destination_root = dest;
            }
            if no_sanitize {
                config.rename.sanitize = false;
            }
            if strip_existing {
                config.rename.strip_existing_patterns = true;
            }
            if no_fs_check {
                config.conflicts.check_filesystem = false;
            }
            run_preview(&config, &pattern, &paths, recursive, &cli.format)
        }
        Some(Commands::Sanitize { name, platform, max_length }) => {
            let mut options = config.sanitize_options();
            if let Some(platform) = platform {
                options.platform = parse_arg::<Platform>(&platform)?;
            }
            if let Some(max) = max_length {
                options.max_length = max;
            }
            run_sanitize(&name, &options, &cli.format)
        }
        Some(Commands::Config { action }) => run_config_command(config, action),
        None => {
            Cli::command()
                .print_help()
                .map_err(OnomaError::FileSystem)?;
            Ok(())
        }
    }
}

fn parse_arg<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T> {
    value.parse::<T>().map_err(OnomaError::InvalidArgument)
}

/// Run template validation
fn run_validate(config: &AppConfig, pattern: &str, format: &str) -> Result<()> {
    let pattern = config.template(pattern);
    let result = validate(pattern);

    match format {
        "json" | "jsonl" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_validation(pattern, &result),
    }

    if result.valid {
        Ok(())
    } else {
        Err(OnomaError::InvalidArgument(format!("template {:?} is invalid", pattern)))
    }
}

fn print_validation(pattern: &str, result: &ValidationResult) {
    let verdict = if result.valid { "valid" } else { "INVALID" };
    println!("Template {:?} is {}", pattern, verdict);
    if !result.known_placeholders.is_empty() {
        println!("  Placeholders: {}", result.known_placeholders.join(", "));
    }
    for issue in &result.issues {
        let label = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        print!("  {}[{}]: {}", label, issue.code, issue.message);
        if let Some(position) = issue.position {
            print!(" (at {})", position);
        }
        println!();
    }
}

/// Collect files from the given paths
fn collect_files(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            if recursive {
                files.extend(walkdir(path));
            } else if let Ok(entries) = std::fs::read_dir(path) {
                files.extend(entries.flatten().map(|e| e.path()).filter(|p| p.is_file()));
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files
}

/// Walk directory recursively
fn walkdir(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(entries) = std::fs::read_dir(path) {
        for entry in entries.flatten() {
            let p = entry.path();
            if p.is_dir() {
                files.extend(walkdir(&p));
            } else if p.is_file() {
                files.push(p);
            }
        }
    }

    files
}

/// Run a rename preview
fn run_preview(
    config: &AppConfig,
    pattern: &str,
    paths: &[PathBuf],
    recursive: bool,
    format: &str,
) -> Result<()> {
    let pattern = config.template(pattern);

    let validation = validate(pattern);
    for issue in validation.warnings() {
        warn!("{}", issue.message);
    }

    let mut contexts = Vec::new();
    for path in collect_files(paths, recursive) {
        match FileContext::from_path(&path) {
            Ok(ctx) => contexts.push(ctx),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    debug!("Collected {} files", contexts.len());

    let batch = generate_proposals(pattern, &contexts, &config.proposal_options());
    let report = detect_conflicts(batch.proposals, &config.conflict_options());

    match format {
        "json" => {
            let grouped = GroupedPreview::new(&report.proposals);
            let output = serde_json::json!({
                "template": pattern,
                "report": &report,
                "summary": &grouped.summary,
                "actions": report.action_summary(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "jsonl" => {
            for proposal in &report.proposals {
                println!("{}", serde_json::to_string(proposal)?);
            }
        }
        _ => print_report(&report),
    }

    if !report.disk_errors.is_empty() {
        warn!("{} paths could not be checked on disk", report.disk_errors.len());
    }
    if report.can_execute() {
        info!("All {} proposals can proceed", report.proposals.len());
    }
    Ok(())
}

fn print_proposal(proposal: &RenameProposal) {
    let diff = render_plain(&diff_proposal(proposal));
    match &proposal.destination_folder {
        Some(folder) => println!("  {} -> {}", diff, folder.display()),
        None => println!("  {}", diff),
    }
    for issue in &proposal.issues {
        print!("      {}: {}", issue.code, issue.message);
        if let Some(suggestion) = &issue.suggestion {
            print!(" (try {:?})", suggestion);
        }
        println!();
    }
}

fn print_section(title: &str, proposals: &[&RenameProposal]) {
    if proposals.is_empty() {
        return;
    }
    println!("{} ({}):", title, proposals.len());
    for proposal in proposals {
        print_proposal(proposal);
    }
    println!();
}

fn print_report(report: &ConflictReport) {
    let grouped = GroupedPreview::new(&report.proposals);

    print_section("Ready", &grouped.ready);
    print_section("Conflicts", &grouped.issues.conflicts);
    print_section("Missing data", &grouped.issues.missing_data);
    print_section("Invalid names", &grouped.issues.invalid_names);
    print_section("Other issues", &grouped.issues.other);
    print_section("Unchanged", &grouped.unchanged);

    for error in &report.disk_errors {
        println!("Could not check {}: {}", error.path.display(), error.message);
    }

    let s = &grouped.summary;
    println!(
        "{} files: {} ready ({:.0}%), {} with issues, {} unchanged, {} blocked",
        s.total, s.total_ready, s.ready_percent, s.total_issues, s.total_unchanged, s.blocked_count
    );
}

/// Run single-name sanitization
fn run_sanitize(name: &str, options: &onoma::SanitizeOptions, format: &str) -> Result<()> {
    let result = sanitize(name, options);
    match format {
        "json" | "jsonl" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => {
            println!("{}", result.sanitized);
            for change in &result.changes {
                println!("  {}", change.message);
            }
        }
    }
    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output, force } => {
            if output.exists() && !force {
                return Err(OnomaError::Config(format!(
                    "{} already exists. Use --force to overwrite",
                    output.display()
                )));
            }
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["onoma"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
        assert_eq!(cli.format, "text");
    }

    #[test]
    fn test_cli_preview_command() {
        let cli = Cli::try_parse_from([
            "onoma", "preview", "{year}-{original}", "/tmp/a.jpg", "/tmp/b.jpg",
            "--platform", "linux", "--no-fs-check", "--strip-existing", "--format", "json",
        ])
        .unwrap();

        assert_eq!(cli.format, "json");
        match cli.command {
            Some(Commands::Preview {
                pattern,
                paths,
                platform,
                no_fs_check,
                no_sanitize,
                strip_existing,
                ..
            }) => {
                assert_eq!(pattern, "{year}-{original}");
                assert_eq!(paths.len(), 2);
                assert_eq!(platform.as_deref(), Some("linux"));
                assert!(no_fs_check);
                assert!(!no_sanitize);
                assert!(strip_existing);
            }
            _ => panic!("Expected Preview command"),
        }
    }

    #[test]
    fn test_cli_preview_requires_paths() {
        assert!(Cli::try_parse_from(["onoma", "preview", "{name}"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_platform() {
        assert!(Cli::try_parse_from(["onoma", "sanitize", "a.txt", "--platform", "beos"]).is_err());
    }

    #[test]
    fn test_collect_files_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::write(dir.path().join("sub").join("b.txt"), b"b").unwrap();

        let flat = collect_files(&[dir.path().to_path_buf()], false);
        assert_eq!(flat.len(), 1);

        let deep = collect_files(&[dir.path().to_path_buf()], true);
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_parse_arg() {
        assert_eq!(parse_arg::<Platform>("windows").unwrap(), Platform::Windows);
        assert!(matches!(parse_arg::<CaseStyle>("loud"), Err(OnomaError::InvalidArgument(_))));
    }
}
