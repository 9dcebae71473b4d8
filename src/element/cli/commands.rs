//! Context setup and per-command handlers.
//!
//! - `run()`: parses arguments, installs logging and dispatches
//! - `init_context()`: builds the API from the working directory, the user's home
//!   and the configuration file
//! - `handle_*()`: prompt where needed, call the API, print the result

use super::prompt::{ask_secret_stdin, ask_stdin, choose_stdin, confirm_stdin};
use super::render::{print_categories, print_details, print_messages};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::{BaseDirs, ProjectDirs};
use element::api::{ElementApi, PublishOptions, UpdateOptions};
use element::config::ElementConfig;
use element::error::{ElementError, Result};
use element::registry::http::HttpRegistry;
use element::store::fs::FileStore;
use element::store::RC_FILE;
use element::toolchain::SystemToolchain;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Overrides the directory holding the credential file.
const HOME_ENV: &str = "ELEMENT_HOME";

type AppApi = ElementApi<FileStore, HttpRegistry, SystemToolchain>;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut api = init_context(&cli)?;

    match cli.command {
        Commands::Login { username, password } => handle_login(&mut api, username, password),
        Commands::Logout => handle_logout(&mut api),
        Commands::New { name } => handle_new(&mut api, &name),
        Commands::Categories => handle_categories(&api),
        Commands::Info { major_version } => handle_info(&api, major_version),
        Commands::Publish {
            name,
            category,
            integration,
            major_version,
            silent,
            cache_duration,
        } => {
            if major_version {
                handle_major_version(&mut api, silent)
            } else {
                let options = PublishOptions {
                    name,
                    category,
                    integration,
                    cache_duration,
                };
                handle_publish(&mut api, options)
            }
        }
        Commands::Update {
            toggle_public,
            unminified,
            category,
            integration,
            cache_duration,
        } => {
            let options = UpdateOptions {
                toggle_public,
                unminified,
                category,
                integration,
                cache_duration,
            };
            handle_update(&mut api, &options)
        }
        Commands::Release { note, silent } => handle_release(&mut api, note, silent),
        Commands::Rollback { silent } => handle_rollback(&mut api, silent),
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` shows this crate's debug output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "element=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppApi> {
    let cwd = std::env::current_dir()?;
    let token_path = home_dir()?.join(RC_FILE);

    let config = match ProjectDirs::from("com", "volusion", "element") {
        Some(dirs) => ElementConfig::load(dirs.config_dir()).unwrap_or_else(|e| {
            warn!("Ignoring unreadable config in {}: {}", dirs.config_dir().display(), e);
            ElementConfig::default()
        }),
        None => ElementConfig::default(),
    }
    .with_env()
    .with_flags(cli.verbose, cli.skip_build);
    debug!("Registry at {}", config.registry_host);

    let store = FileStore::new(cwd, token_path);
    let registry = HttpRegistry::new(config.clone())?;
    Ok(ElementApi::new(store, registry, SystemToolchain, config))
}

fn home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| {
            ElementError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine the home directory; set ELEMENT_HOME.",
            ))
        })
}

fn handle_login(api: &mut AppApi, username: Option<String>, password: Option<String>) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => ask_stdin("Enter your username")?,
    };
    let password = match password {
        Some(p) => p,
        None => ask_secret_stdin("Enter your password")?,
    };
    let result = api.login(&username, &password)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_logout(api: &mut AppApi) -> Result<()> {
    let result = api.logout()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_new(api: &mut AppApi, name: &str) -> Result<()> {
    let result = api.new_block(name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_categories(api: &AppApi) -> Result<()> {
    let result = api.categories()?;
    print_categories(&result.categories);
    Ok(())
}

fn handle_info(api: &AppApi, version: Option<u32>) -> Result<()> {
    let result = api.info(version)?;
    if let Some(details) = &result.details {
        print_details(details);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_publish(api: &mut AppApi, mut options: PublishOptions) -> Result<()> {
    if options.category.is_none() {
        // Fail on local state before asking anything.
        api.block()?;
        let categories = api.categories()?.categories;
        options.category = Some(choose_stdin(
            "Select the Category that best fits this block:",
            &categories,
        )?);
    }
    let result = api.publish(&options)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_major_version(api: &mut AppApi, silent: bool) -> Result<()> {
    if !silent {
        let record = api.block()?;
        let question = format!(
            "Are you sure you want to create a new major release of {} (currently v{})? We recommend tagging your major releases and creating new branches from them for future updates.",
            record.display_name,
            record.active_version()
        );
        if !confirm_stdin(&question)? {
            return Err(ElementError::Declined);
        }
    }
    let result = api.new_major_version()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_update(api: &mut AppApi, options: &UpdateOptions) -> Result<()> {
    let result = api.update(options)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_release(api: &mut AppApi, note: Option<String>, silent: bool) -> Result<()> {
    if !silent {
        let record = api.block()?;
        let question = format!(
            "You are about to release your updates to {} v{} to production.\nNon-major version changes will take effect immediately on the stores that have your block installed.\nContinue?",
            record.display_name,
            record.active_version()
        );
        if !confirm_stdin(&question)? {
            println!(
                "If you are releasing a breaking change you should create a major release using \"element publish -m\""
            );
            return Err(ElementError::Declined);
        }
    }
    let result = api.release(note.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rollback(api: &mut AppApi, silent: bool) -> Result<()> {
    if !silent {
        let record = api.block()?;
        let question = format!(
            "Do you want to rollback {} to the previous active release of version {}?\nThis will affect all the stores that have your block installed.\nContinue?",
            record.display_name,
            record.active_version()
        );
        if !confirm_stdin(&question)? {
            return Err(ElementError::Declined);
        }
    }
    let result = api.rollback()?;
    print_messages(&result.messages);
    Ok(())
}
