use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use surface_router::config::{load_config, AppConfig, LoggingConfig};
use surface_router::functions::{builtin, manifest};
use surface_router::observability::init_logging;

#[derive(Debug, Parser)]
#[command(name = "surface-cli")]
#[command(about = "Inspect function declarations and runtime configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the built-in function manifest
    Manifest {
        /// Only print this function
        #[arg(short, long)]
        function: Option<String>,
    },
    /// Load and validate a configuration file
    CheckConfig {
        path: PathBuf,
    },
}

/// Manifest for the whole catalog or one function; `None` if the function is unknown.
fn manifest_output(function: Option<&str>) -> Option<Value> {
    match function {
        None => Some(manifest(&builtin::catalog())),
        Some(id) => builtin::lookup(id).map(|def| manifest([&def])),
    }
}

fn redacted(mut config: AppConfig) -> AppConfig {
    if !config.api.token.is_empty() {
        config.api.token = "<redacted>".to_string();
    }
    config
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        level: "warn".to_string(),
        ..LoggingConfig::default()
    })?;

    match cli.command {
        Commands::Manifest { function } => match manifest_output(function.as_deref()) {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => {
                eprintln!("Error: no built-in function `{}`", function.unwrap_or_default());
                std::process::exit(1);
            }
        },
        Commands::CheckConfig { path } => match load_config(&path) {
            Ok(config) => println!("{}", serde_json::to_string_pretty(&redacted(config))?),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_manifest() {
        let cli = Cli::try_parse_from(["surface-cli", "manifest"]).unwrap();
        assert!(matches!(cli.command, Commands::Manifest { function: None }));

        let cli = Cli::try_parse_from(["surface-cli", "manifest", "--function", "open_form"]).unwrap();
        assert!(matches!(cli.command, Commands::Manifest { function: Some(ref f) } if f == "open_form"));
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::try_parse_from(["surface-cli", "check-config", "app.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig { ref path } if path == &PathBuf::from("app.toml")));

        assert!(Cli::try_parse_from(["surface-cli", "check-config"]).is_err());
        assert!(Cli::try_parse_from(["surface-cli"]).is_err());
    }

    #[test]
    fn test_manifest_output() {
        let all = manifest_output(None).unwrap();
        assert!(all.get("open_form").is_some());
        assert!(all.get("send_message").is_some());

        let one = manifest_output(Some("open_form")).unwrap();
        assert_eq!(one.as_object().unwrap().len(), 1);
        assert!(one.get("open_form").is_some());

        assert!(manifest_output(Some("nope")).is_none());
    }

    #[test]
    fn test_token_redacted() {
        let mut config = AppConfig::default();
        config.api.token = "xoxb-secret".to_string();
        let rendered = serde_json::to_string(&redacted(config)).unwrap();
        assert!(!rendered.contains("xoxb-secret"));
        assert!(rendered.contains("<redacted>"));

        assert_eq!(redacted(AppConfig::default()).api.token, "");
    }
}
