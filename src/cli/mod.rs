//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod settings;

use std::error::Error;
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::api::BackendClient;
use crate::cli::settings::{SettingError, SettingRegistry};
use crate::core::catalog::CatalogAggregator;
use crate::core::config::data::path_display;
use crate::core::config::{BackendConfig, BackendOverrides, Config};
use crate::core::view::ViewController;
use crate::ui::driver::ViewDriver;
use crate::ui::render::render_view;
use crate::utils::logging;

#[derive(Parser)]
#[command(name = "mcpdeck")]
#[command(about = "Browse the MCP prompts, tools, and prompt files a backend exposes")]
#[command(
    long_about = "mcpdeck queries an MCP-enabled backend and shows everything it makes \
discoverable: MCP prompts (usable as slash commands), MCP tools, and the markdown \
prompt files in its prompts directory.\n\n\
Configuration (highest precedence first):\n\
  --base-url / --token      Command-line flags\n\
  MCPDECK_BASE_URL          Backend root URL (default http://localhost:8000)\n\
  MCPDECK_TOKEN             Bearer token (DATABRICKS_TOKEN is used as a fallback)\n\
  mcpdeck set <key> <value> Persisted settings (base-url, token, timeout)\n\n\
Logging:\n\
  RUST_LOG                  Standard tracing filter, written to stderr\n\
  -v, --verbose             Shortcut for debug output from mcpdeck"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend root URL, overriding the environment and config file
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token, overriding the environment and config file
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Log debug diagnostics to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every MCP prompt, MCP tool, and prompt file (default)
    List,
    /// Show the full content of one prompt file
    Show {
        /// Prompt file name, without the .md extension
        name: String,
    },
    /// Print the backend's MCP server description
    Info,
    /// Set configuration values, or list them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let overrides = BackendOverrides {
        base_url: args.base_url,
        token: args.token,
    };

    match args.command.unwrap_or(Commands::List) {
        Commands::List => {
            let driver = mounted_driver(overrides).await?;
            print!("{}", render_view(driver.controller()));
            exit_on_view_error(driver.controller());
            Ok(())
        }
        Commands::Show { name } => {
            let mut driver = mounted_driver(overrides).await?;
            driver.select(name).await;
            print!("{}", render_view(driver.controller()));
            exit_on_view_error(driver.controller());
            Ok(())
        }
        Commands::Info => {
            let client = BackendClient::new(resolve_backend(overrides)?)?;
            match client.info().await {
                Ok(info) => {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                    Ok(())
                }
                Err(err) => {
                    eprintln!("❌ Failed to load server info: {err}");
                    process::exit(1);
                }
            }
        }
        Commands::Set { key, value } => {
            let registry = SettingRegistry::new();
            let mut config = Config::load()?;
            let Some(key) = key else {
                println!("mcpdeck configuration ({}):", config_location());
                println!("{}", registry.format_all(&config));
                return Ok(());
            };
            let outcome = registry
                .get(&key)
                .and_then(|handler| handler.set(&value, &mut config));
            finish_setting(outcome, &config)
        }
        Commands::Unset { key } => {
            let registry = SettingRegistry::new();
            let mut config = Config::load()?;
            let outcome = registry
                .get(&key)
                .map(|handler| handler.unset(&mut config));
            finish_setting(outcome, &config)
        }
    }
}

fn resolve_backend(overrides: BackendOverrides) -> Result<BackendConfig, Box<dyn Error>> {
    let config = Config::load()?;
    let backend = config.resolve_backend(overrides)?;
    debug!(
        base_url = %backend.base_url,
        has_token = backend.token.is_some(),
        timeout = ?backend.timeout,
        "Resolved backend"
    );
    Ok(backend)
}

async fn mounted_driver(overrides: BackendOverrides) -> Result<ViewDriver, Box<dyn Error>> {
    let client = BackendClient::new(resolve_backend(overrides)?)?;
    let controller = ViewController::new(CatalogAggregator::from_client(client));
    let mut driver = ViewDriver::new(controller);
    driver.mount().await;
    Ok(driver)
}

fn exit_on_view_error(controller: &ViewController) {
    if controller.error().is_some() {
        process::exit(1);
    }
}

fn finish_setting(
    outcome: Result<String, SettingError>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let result = outcome.and_then(|message| {
        config
            .save()
            .map_err(|err| SettingError::ConfigError(err.to_string()))?;
        Ok(message)
    });
    match result {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            process::exit(err.exit_code());
        }
    }
}

fn config_location() -> String {
    Config::get_config_path()
        .map(path_display)
        .unwrap_or_else(|_| "no config directory".to_string())
}
