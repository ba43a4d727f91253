use anyhow::Result;
use clap::{CommandFactory, Parser};
use ocrfix::app::{
    Overrides, RunOptions, run_correct, run_prepare, run_reset, run_stats, run_train, run_unsquish,
};
use ocrfix::cli::{Cli, Commands, ConfigAction, DictionariesAction};
use ocrfix::config::Config;
use ocrfix::decision::prompt::TerminalPrompter;
use ocrfix::dictionary::{format_dictionary_info, list_dictionaries};
use ocrfix::processor::RunReport;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    ocrfix::logging::init(cli.verbose);
    tracing::debug!(version = %ocrfix::version_string(), "ocrfix starting");

    let overrides = Overrides {
        db_file: cli.db_file.clone(),
        language: cli.lang.clone(),
        dictionary: cli.dictionary.clone(),
        dict_threshold: cli.dict_threshold,
    };

    match cli.command {
        Commands::Prepare { path, output_dir } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let report = run_prepare(&config, &path, &output_dir, cli.quiet)?;
            if !cli.quiet {
                eprintln!(
                    "{} prepared, {} failed",
                    report.prepared.len().green(),
                    report.failed.len()
                );
            }
            if !report.failed.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Train {
            path,
            dry_run,
            basic,
        } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let options = RunOptions {
                dry_run,
                output_dir: None,
                quiet: cli.quiet,
            };
            let report = run_train(config, &path, basic, &options)?;
            exit_on_file_errors(&report);
        }
        Commands::Correct {
            path,
            output_dir,
            dry_run,
            json,
        } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let options = RunOptions {
                dry_run,
                output_dir,
                quiet: cli.quiet || json,
            };
            let report = run_correct(config, &path, &options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            exit_on_file_errors(&report);
        }
        Commands::Unsquish {
            path,
            fallback,
            output_dir,
            dry_run,
        } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let options = RunOptions {
                dry_run,
                output_dir,
                quiet: cli.quiet,
            };
            let report = run_unsquish(config, &path, fallback, &options)?;
            exit_on_file_errors(&report);
        }
        Commands::Reset { yes } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let mut prompter = TerminalPrompter::stdin();
            match run_reset(&config, yes, &mut prompter)? {
                Some(deleted) => println!("Deleted {} stored corrections", deleted.green()),
                None => println!("{}", "Nothing deleted".dimmed()),
            }
        }
        Commands::Stats { json } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let stats = run_stats(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Database:        {}", config.history.db_file.display());
                println!("Records:         {}", stats.records);
                println!("Auto-apply:      {}", stats.auto_records);
                println!("Distinct errors: {}", stats.distinct_errors);
            }
        }
        Commands::Dictionaries { action } => {
            handle_dictionaries_command(action).await?;
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ocrfix", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Command-line flags (--db-file, --lang, --dictionary, --dict-threshold)
/// 2. Environment variables (OCRFIX_*)
/// 3. Custom config path from CLI (--config), else ~/.config/ocrfix/config.toml
/// 4. Built-in defaults
fn load_config(custom_path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };
    Ok(overrides.apply(config.with_env_overrides())?)
}

/// Exit non-zero when any document could not be read or written.
fn exit_on_file_errors(report: &RunReport) {
    let failed: Vec<_> = report
        .files
        .iter()
        .filter_map(|f| f.error.as_ref().map(|e| (&f.path, e)))
        .collect();
    if failed.is_empty() {
        return;
    }
    for (path, error) in failed {
        eprintln!("{} {}: {error}", "failed".yellow(), path.display());
    }
    std::process::exit(1);
}

/// Handle dictionary management commands.
async fn handle_dictionaries_command(action: DictionariesAction) -> Result<()> {
    match action {
        DictionariesAction::List => {
            println!("Available dictionaries:");
            for info in list_dictionaries() {
                println!("  {}", format_dictionary_info(info));
            }
        }
        DictionariesAction::Install { language } => {
            #[cfg(feature = "dictionary-download")]
            {
                let path = ocrfix::download::download_dictionary(&language, true).await?;
                println!("Dictionary '{}' installed successfully", language.green());
                println!("Location: {}", path.display());
            }
            #[cfg(not(feature = "dictionary-download"))]
            {
                eprintln!("Dictionary download is not available in this build.");
                eprintln!(
                    "Rebuild with --features dictionary-download, or place the file in {}",
                    ocrfix::dictionary::dictionaries_dir().display()
                );
                eprintln!("Requested language: {language}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

/// Handle configuration commands.
fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    let config_path = custom_path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides();
            match config.get_value_by_path(&key) {
                Ok(value) => println!("{}", value),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            Config::set_value_by_path(&config_path, &key, &value)?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::List { section } => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides();
            let rendered = config.to_display_toml()?;
            match section {
                None => print!("{rendered}"),
                Some(section) => {
                    let table: toml::Table = toml::from_str(&rendered)?;
                    match table.get(&section) {
                        Some(toml::Value::Table(values)) => {
                            println!("[{section}]");
                            print!("{}", toml::to_string_pretty(values)?);
                        }
                        _ => {
                            eprintln!("Error: unknown configuration section '{section}'");
                            std::process::exit(1);
                        }
                    }
                }
            }
        }
        ConfigAction::Dump => {
            print!("{}", Config::dump_template());
        }
    }
    Ok(())
}
