use clap::Parser;
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::fs as async_fs;

mod cli;
mod config;
mod secrets;
use cli::{Args, Commands};
use config::{Config, ConfigManager};
use secrets::{KeyringStore, PasswordStore};
use youtrack_api::{Event, HookResponse, IssueImpactPayload, YouTrackService};

/// Result of one command: what to print and whether it counts as success.
struct Outcome {
    output: Value,
    success: bool,
}

impl Outcome {
    fn from_serializable<T: Serialize>(value: &T, success: bool) -> Result<Self, String> {
        let output = serde_json::to_value(value)
            .map_err(|err| format!("Failed to encode output: {err}"))?;
        Ok(Self { output, success })
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_text(value: &str, limit: usize) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    if limit <= 1 {
        return "…".to_string();
    }
    let mut truncated: String = trimmed.chars().take(limit - 1).collect();
    truncated.push('…');
    truncated
}

/// Shortens an error for logging and hides it entirely when it looks like it carries credentials.
fn redact_log_details(value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    let category = collapsed
        .split(':')
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .unwrap_or("error");
    let lowered = collapsed.to_lowercase();
    let has_sensitive_hint = ["password", "cookie", "set-cookie", "authorization", "token"]
        .iter()
        .any(|hint| lowered.contains(hint));

    if has_sensitive_hint {
        return format!(
            "{}: <redacted-sensitive-details>",
            truncate_text(category, 64)
        );
    }

    truncate_text(&collapsed, 180)
}

fn config_manager(path: Option<PathBuf>) -> Result<ConfigManager, String> {
    match path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => ConfigManager::new(),
    }
}

/// Loads the config file, applies overrides from `lookup` and fills a missing password from the
/// keychain.
fn load_config<F>(manager: &ConfigManager, secrets: &dyn PasswordStore, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    debug!("Loading configuration from {}", manager.path().display());
    let mut config = manager.load();
    config.apply_overrides(lookup);
    if config.password.is_empty() && !config.username.trim().is_empty() {
        match secrets.load_password(&config.username) {
            Ok(Some(password)) => config.password = password,
            Ok(None) => debug!("No stored password for {}", config.username),
            Err(err) => warn!("{}", redact_log_details(&err)),
        }
    }
    config
}

async fn read_payload(path: Option<&Path>) -> Result<Value, String> {
    let raw = match path {
        Some(path) => async_fs::read_to_string(path)
            .await
            .map_err(|err| format!("Failed to read payload {}: {err}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("Failed to read payload from stdin: {err}"))?;
            buffer
        }
    };
    serde_json::from_str(&raw).map_err(|err| format!("Payload is not valid JSON: {err}"))
}

fn configure(
    manager: &ConfigManager,
    secrets: &dyn PasswordStore,
    base_url: Option<String>,
    project_id: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<Outcome, String> {
    let mut config = manager.load();
    let updates = [
        (base_url, &mut config.base_url),
        (project_id, &mut config.project_id),
        (username, &mut config.username),
    ];
    for (value, field) in updates {
        if let Some(value) = value {
            *field = value;
        }
    }
    if let Some(password) = password {
        if config.username.trim().is_empty() {
            return Err("A username is required to store a password".to_string());
        }
        secrets.save_password(&config.username, &password)?;
        info!("Stored password for {} in the keychain", config.username);
    }
    manager
        .save(&config)
        .map_err(|err| format!("Failed to save config: {err}"))?;
    info!("Saved configuration to {}", manager.path().display());
    Outcome::from_serializable(
        &serde_json::json!({ "config": manager.path().display().to_string() }),
        true,
    )
}

async fn dispatch(
    service: &YouTrackService,
    config: &Config,
    event: &str,
    payload: Option<&Path>,
) -> Result<Outcome, String> {
    let parsed = event.parse::<Event>().map_err(|err| err.to_string())?;
    let raw = match parsed {
        Event::Verification => Value::Null,
        Event::IssueImpactChange => read_payload(payload).await?,
    };
    let settings = serde_json::to_value(config.project())
        .map_err(|err| format!("Failed to encode settings: {err}"))?;
    let response = service
        .receive(parsed.as_str(), &settings, &raw)
        .await
        .map_err(|err| err.to_string())?;
    let success = match &response {
        HookResponse::Verification(verification) => verification.success,
        HookResponse::Issue(_) => true,
    };
    Outcome::from_serializable(&response, success)
}

async fn execute(args: Args, secrets: &dyn PasswordStore) -> Result<Outcome, String> {
    let manager = config_manager(args.config)?;
    let config = load_config(&manager, secrets, |key| std::env::var(key).ok());
    let service = YouTrackService::new(config.client_options());

    match args.command {
        Commands::Verify => {
            let verification = service.receive_verification(&config.project()).await;
            Outcome::from_serializable(&verification, verification.success)
        }
        Commands::Submit { payload } => {
            let raw = read_payload(payload.as_deref()).await?;
            let payload: IssueImpactPayload = serde_json::from_value(raw)
                .map_err(|err| format!("Invalid issue impact payload: {err}"))?;
            let created = service
                .receive_issue_impact_change(&config.project(), &payload)
                .await
                .map_err(|err| err.to_string())?;
            Outcome::from_serializable(&created, true)
        }
        Commands::Receive { event, payload } => {
            dispatch(&service, &config, &event, payload.as_deref()).await
        }
        Commands::Configure {
            base_url,
            project_id,
            username,
            password,
        } => configure(&manager, secrets, base_url, project_id, username, password),
    }
}

/// Entry point of the hook binary.
pub fn run() -> ExitCode {
    // Load .env values (useful during development) before reading overrides
    let _ = dotenvy::dotenv();
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();

    let args = Args::parse();
    info!("Starting YouTrack hook");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("Failed to start async runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let secrets = KeyringStore::new();
    match runtime.block_on(execute(args, &secrets)) {
        Ok(outcome) => {
            match serde_json::to_string_pretty(&outcome.output) {
                Ok(text) => println!("{text}"),
                Err(err) => {
                    error!("Failed to print output: {}", err);
                    return ExitCode::FAILURE;
                }
            }
            if outcome.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            error!("{}", redact_log_details(&err));
            ExitCode::FAILURE
        }
    }
}
