use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutor_relay_core::{
    config::{CredentialSource, EnvCredentials, Environment, RelayConfig, StaticCredentials},
    llm::{HttpUpstream, OpenAiCompatible, ProviderAdapter},
    relay::TutorRelay,
    server, telemetry,
};

/**
 * \brief Entry point of the tutor relay.
 */
#[derive(Parser, Debug)]
#[command(
    name = "tutor-relay",
    version,
    about = "English tutor chat relay in front of an LLM completion API"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /**
     * \brief Runs the HTTP relay.
     */
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000", env = "TUTOR_RELAY_ADDR")]
        addr: String,
        #[command(flatten)]
        relay: RelayArgs,
    },

    /**
     * \brief Sends one message through the relay and prints the JSON reply.
     */
    Ask {
        #[arg(long)]
        message: String,
        #[arg(long, help = "Use this key instead of reading the provider's environment variable")]
        api_key: Option<String>,
        #[command(flatten)]
        relay: RelayArgs,
    },
}

#[derive(Args, Debug)]
struct RelayArgs {
    #[arg(
        long,
        default_value = "deepseek",
        env = "TUTOR_PROVIDER",
        help = "Upstream provider: deepseek or openai"
    )]
    provider: String,

    #[arg(long, env = "TUTOR_API_BASE", help = "Overrides the provider's API base")]
    api_base: Option<String>,

    #[arg(long, env = "TUTOR_MODEL", help = "Overrides the provider's model")]
    model: Option<String>,

    #[arg(
        long,
        default_value = "production",
        env = "TUTOR_ENV",
        help = "development adds error chains to 500 responses"
    )]
    environment: Environment,

    #[arg(long, env = "TUTOR_TIMEOUT_SECS", help = "Timeout for the upstream call, in seconds")]
    timeout_secs: Option<u64>,

    #[arg(
        long,
        default_value = "info",
        env = "RUST_LOG",
        help = "Log level: trace, debug, info, warn, error"
    )]
    log_level: String,

    #[arg(
        long,
        default_value_t = false,
        env = "TUTOR_TELEMETRY",
        help = "Append request events to <log-dir>/tutor-relay.log"
    )]
    telemetry: bool,

    #[arg(
        long,
        default_value = "logs",
        env = "TUTOR_LOG_DIR",
        help = "Directory of the telemetry event log"
    )]
    log_dir: PathBuf,
}

impl RelayArgs {
    fn config(&self) -> RelayConfig {
        RelayConfig {
            provider: self.provider.clone(),
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            environment: self.environment,
            request_timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    fn init_telemetry(&self) {
        telemetry::set_log_dir(&self.log_dir);
        telemetry::set_enabled(self.telemetry);
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_relay(
    config: &RelayConfig,
    adapter: OpenAiCompatible,
    credentials: Arc<dyn CredentialSource>,
) -> Result<TutorRelay> {
    let upstream = HttpUpstream::new(config.request_timeout).context("create upstream failed")?;
    tracing::info!(
        provider = adapter.name(),
        model = adapter.model(),
        endpoint = adapter.endpoint(),
        environment = config.environment.as_str(),
        "relay configured"
    );
    Ok(TutorRelay::new(
        Arc::new(adapter),
        Arc::new(upstream),
        credentials,
        config.environment,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr, relay } => {
            init_tracing(&relay.log_level);
            relay.init_telemetry();
            let config = relay.config();
            let adapter = OpenAiCompatible::from_config(&config).context("load provider failed")?;
            let relay = build_relay(&config, adapter, Arc::new(EnvCredentials))?;
            if !relay.credential_configured() {
                tracing::warn!(
                    "{} is not set, chat requests will fail until it is",
                    relay.adapter().credential_key()
                );
            }
            server::run(&addr, Arc::new(relay)).await?;
        }
        Commands::Ask {
            message,
            api_key,
            relay,
        } => {
            init_tracing(&relay.log_level);
            relay.init_telemetry();
            let config = relay.config();
            let adapter = OpenAiCompatible::from_config(&config).context("load provider failed")?;
            let credentials: Arc<dyn CredentialSource> = match api_key {
                Some(key) => Arc::new(StaticCredentials::new().with(adapter.credential_key(), key)),
                None => Arc::new(EnvCredentials),
            };
            let relay = build_relay(&config, adapter, credentials)?;
            let resp = relay.ask(&message).await;

            println!("status: {}", resp.status.as_u16());
            if let Some(body) = &resp.body {
                println!("{}", serde_json::to_string_pretty(body)?);
            }
            if !resp.status.is_success() {
                bail!("relay answered with status {}", resp.status);
            }
        }
    }

    Ok(())
}
