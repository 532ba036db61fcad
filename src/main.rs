use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use npu_chat::api::ApiServerBuilder;
use npu_chat::{APP_NAME, Config, ContextStore, HttpBackend, InferenceGateway};

/// NPU Chat - single-flight chat gateway for an NPU-hosted language model
#[derive(Parser)]
#[command(name = "npuchat", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "NPUCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind the chat UI to
    #[arg(long)]
    bind: Option<String>,

    /// Port to bind the chat UI to
    #[arg(short, long)]
    port: Option<u16>,

    /// Inference backend host
    #[arg(long)]
    backend_address: Option<String>,

    /// Inference backend port
    #[arg(long)]
    backend_port: Option<u16>,

    /// Seconds to wait for the backend
    #[arg(long)]
    timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Apply command line flags on top of loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.server.bind_address.clone_from(bind);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(address) = &self.backend_address {
            config.backend.address.clone_from(address);
        }
        if let Some(port) = self.backend_port {
            config.backend.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.backend.timeout_secs = timeout;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,npu_chat=info",
        1 => "info,npu_chat=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;
    tracing::debug!(?config, "loaded configuration");

    let backend = Arc::new(HttpBackend::from_config(&config.backend)?);
    let version = env!("CARGO_PKG_VERSION");
    tracing::info!(
        backend = %backend.url(),
        timeout_secs = config.backend.timeout_secs,
        context_enabled = config.context.enabled,
        context_depth = config.context.max_depth,
        "starting {APP_NAME} v{version}"
    );

    let context = Arc::new(ContextStore::from_config(&config.context));
    let gateway = InferenceGateway::new(context, backend, config.backend.timeout());

    ApiServerBuilder::new(gateway, config.server.addr())
        .static_dir(config.server.static_dir.clone())
        .build()
        .run()
        .await?;

    Ok(())
}
