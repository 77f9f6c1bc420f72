// # eftctl - Globalscape EFT inspection tool
//
// Thin operator front end over `eft-provider`: it reads configuration,
// configures the provider and runs one read-only command, printing the
// resulting state as pretty JSON. All API logic lives in the library crates.
//
// ## Configuration
//
// Environment variables (each overrides the same field of `EFT_CONFIG`):
//
// - `EFT_CONFIG`: Path to a JSON file with `host`, `username`, `password`,
//   `auth_type`, `insecure_skip_verify` (optional)
// - `EFT_HOST`: Base URL of the admin API, e.g. `https://eft.example.com:4450`
// - `EFT_USERNAME`: Admin username
// - `EFT_PASSWORD`: Admin password
// - `EFT_AUTH_TYPE`: `EFT` (default) or `AD`
// - `EFT_INSECURE_SKIP_VERIFY`: `true` to skip TLS verification
// - `EFT_LOG_LEVEL`: trace, debug, info, warn, error (default: warn)
//
// ## Commands
//
// ```bash
// eftctl server
// eftctl sites
// eftctl site-user <site_id>/<user_id>
// eftctl event-rule <site_id>/<rule_id>
// ```
//
// Ctrl-C aborts the request in flight.

use anyhow::Result;
use eft_core::{ImportId, ProviderConfig};
use eft_provider::EftProvider;
use serde_json::Value;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Command succeeded
/// - 1: Usage or configuration error
/// - 2: Runtime error (network, authentication, API)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EftExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<EftExitCode> for ExitCode {
    fn from(code: EftExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

const USAGE: &str = "usage: eftctl <server | sites | site-user <site_id>/<user_id> | event-rule <site_id>/<rule_id>>";

/// What to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Server,
    Sites,
    SiteUser(ImportId),
    EventRule(ImportId),
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let arg = |i: usize| args.get(i).map(String::as_str);

        match (arg(0), arg(1), args.len()) {
            (Some("server"), None, 1) => Ok(Self::Server),
            (Some("sites"), None, 1) => Ok(Self::Sites),
            (Some("site-user"), Some(id), 2) => Ok(Self::SiteUser(ImportId::parse(id, "user_id")?)),
            (Some("event-rule"), Some(id), 2) => Ok(Self::EventRule(ImportId::parse(id, "rule_id")?)),
            _ => anyhow::bail!("{}", USAGE),
        }
    }
}

/// Application configuration
struct Config {
    provider: ProviderConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut provider = match lookup("EFT_CONFIG") {
            Some(path) if !path.is_empty() => ProviderConfig::from_file(&path)?,
            _ => ProviderConfig::default(),
        };

        if let Some(host) = lookup("EFT_HOST") {
            provider.host = host;
        }
        if let Some(username) = lookup("EFT_USERNAME") {
            provider.username = username;
        }
        if let Some(password) = lookup("EFT_PASSWORD") {
            provider.password = password;
        }
        if let Some(auth_type) = lookup("EFT_AUTH_TYPE") {
            provider.auth_type = Some(auth_type);
        }
        if let Some(raw) = lookup("EFT_INSECURE_SKIP_VERIFY") {
            let insecure = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => anyhow::bail!(
                    "EFT_INSECURE_SKIP_VERIFY must be true or false. Got: {}",
                    other
                ),
            };
            provider.insecure_skip_verify = Some(insecure);
        }

        Ok(Self {
            provider,
            log_level: lookup("EFT_LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.provider.validate().map_err(|e| {
            anyhow::anyhow!(
                "{}. Set EFT_HOST, EFT_USERNAME and EFT_PASSWORD (or EFT_CONFIG)",
                e
            )
        })?;

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "EFT_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return EftExitCode::ConfigError.into();
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return EftExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return EftExitCode::ConfigError.into();
    }

    let log_level = config.level().unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return EftExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return EftExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        tokio::select! {
            outcome = run(config, command) => match outcome {
                Ok(state) => {
                    match serde_json::to_string_pretty(&state) {
                        Ok(text) => {
                            println!("{}", text);
                            EftExitCode::Success
                        }
                        Err(e) => {
                            error!("Failed to render state: {}", e);
                            EftExitCode::RuntimeError
                        }
                    }
                }
                Err(e) => {
                    error!("{}", e);
                    eprintln!("Error: {}", e);
                    EftExitCode::RuntimeError
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, request aborted");
                EftExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Configure the provider and run `command`
async fn run(config: Config, command: Command) -> Result<Value> {
    let mut provider = EftProvider::new();
    provider.configure(&config.provider).await?;

    let state = match command {
        Command::Server => provider.data_source("globalscapeeft_server")?.read().await?,
        Command::Sites => provider.data_source("globalscapeeft_sites")?.read().await?,
        Command::SiteUser(id) => {
            let users = provider.resource("globalscapeeft_site_user")?;
            let state = users.import_state(&id.to_string())?;
            users.read(state).await?
        }
        Command::EventRule(id) => {
            let rules = provider.resource("globalscapeeft_event_rule")?;
            let state = rules.import_state(&id.to_string())?;
            rules.read(state).await?
        }
    };

    Ok(state)
}
