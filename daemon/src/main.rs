//! vouch daemon: entry point for the verification gateway and its tooling.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;

use vouch_rpc::{AppState, GatewayConfig, GatewayServer, HttpAuthority};
use vouch_statement::{scan_resources, StatementBuilder, StatementRequest, TraitMap};
use vouch_types::{Identity, Provider};
use vouch_utils::{format_duration, init_logging, LogFormat};
use vouch_verification::validate;

#[derive(Parser)]
#[command(name = "vouch-daemon", about = "Trait-gated wallet verification gateway")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "VOUCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "VOUCH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "VOUCH_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the HTTP gateway.
    Serve {
        /// Address to bind.
        #[arg(long, env = "VOUCH_HOST")]
        host: Option<String>,

        /// Port to listen on.
        #[arg(long, env = "VOUCH_PORT")]
        port: Option<u16>,

        /// Verification authority endpoint.
        #[arg(long, env = "VOUCH_AUTHORITY_URL")]
        authority_url: Option<String>,
    },

    /// Print the traits, action and verification id a statement carries.
    Inspect {
        /// Provider whose traits to extract.
        #[arg(long)]
        provider: Provider,

        /// Also validate against this configured policy.
        #[arg(long)]
        policy: Option<String>,

        /// Statement file, or "-" for stdin.
        #[arg(default_value = "-")]
        file: PathBuf,
    },

    /// Build a statement and print its text.
    Statement {
        /// Wallet identity that will sign.
        #[arg(long)]
        identity: Identity,

        #[arg(long)]
        provider: Option<Provider>,

        /// Trait requirement as name=raw, e.g. followers=gte:1000. Repeatable.
        #[arg(long = "trait", value_parser = parse_trait_arg)]
        traits: Vec<(String, String)>,

        #[arg(long)]
        action: Option<String>,

        #[arg(long)]
        verification_id: Option<String>,

        /// Override the configured domain.
        #[arg(long)]
        domain: Option<String>,

        /// Type-check trait requirements before encoding.
        #[arg(long)]
        strict: bool,
    },
}

fn parse_trait_arg(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, raw)| (name.to_string(), raw.to_string()))
        .ok_or_else(|| format!("expected name=value, got {s:?}"))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GatewayConfig> {
    match path {
        Some(path) => GatewayConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(GatewayConfig::default()),
    }
}

fn read_input(file: &Path) -> anyhow::Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading statement from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    let is_serve = matches!(cli.command, Command::Serve { .. });
    let level = match (&cli.log_level, is_serve) {
        (Some(level), _) => level.clone(),
        (None, true) => config.log_level.clone(),
        (None, false) => "warn".to_string(),
    };
    init_logging(cli.log_format.unwrap_or(config.log_format), &level)?;
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Serve {
            host,
            port,
            authority_url,
        } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(url) = authority_url {
                config.authority_url = url;
            }
            if config.policies.is_empty() {
                tracing::warn!("no policies configured; every submission will be refused");
            }

            let authority = HttpAuthority::new(
                config.authority_url.clone(),
                Duration::from_secs(config.authority_timeout_secs),
            )?;
            tracing::info!(
                "Starting gateway on {}:{} (authority: {}, statement TTL: {}, signature TTL: {})",
                config.host,
                config.port,
                authority.url(),
                format_duration(config.statement.ttl_secs),
                format_duration(config.signature_ttl_secs),
            );
            let state = Arc::new(AppState::new(Arc::new(authority), config.policies.clone())?);
            GatewayServer::new(config.host.clone(), config.port, state)
                .start()
                .await?;
            tracing::info!("vouch daemon exited cleanly");
        }

        Command::Inspect {
            provider,
            policy,
            file,
        } => {
            let text = read_input(&file)?;
            let scan = scan_resources(&text, provider)?;
            let mut report = serde_json::json!({
                "provider": provider,
                "scoped": scan.is_scoped_to(provider),
                "traits": scan.traits,
                "action": scan.action,
                "verification_id": scan.verification_id,
                "dropped_lines": scan.dropped_lines,
                "duplicate_traits": scan.duplicate_traits,
                "duplicate_actions": scan.duplicate_actions,
            });
            if let Some(name) = policy {
                let Some(policy) = config.policy(&name) else {
                    bail!("unknown policy: {name}");
                };
                if policy.provider != provider {
                    bail!("policy {name} is for provider {}", policy.provider);
                }
                report["validation"] = serde_json::to_value(validate(&scan.traits, &policy.expected))?;
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Statement {
            identity,
            provider,
            traits,
            action,
            verification_id,
            domain,
            strict,
        } => {
            let request = StatementRequest {
                provider,
                traits: traits.into_iter().collect::<TraitMap>(),
                action,
                verification_id,
                domain,
                ..StatementRequest::default()
            };
            let built = StatementBuilder::new(config.statement)
                .strict(strict)
                .build(&identity, &request)?;
            println!("{}", built.text());
        }
    }

    Ok(())
}
