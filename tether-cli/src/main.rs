use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tether_client::{
    EngineConfig, PeerId, RelayConfig, SessionConfig, SessionOrchestrator, ShutdownReason,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "One-to-one WebRTC signaling client")]
struct Cli {
    /// Websocket URL of the signaling relay.
    #[arg(long, env = "TETHER_RELAY_URL", default_value = "ws://localhost:8888")]
    relay_url: String,

    /// Identifier sent to the relay as `client_id`.
    #[arg(long, env = "TETHER_PEER_ID", default_value = "streamer")]
    peer_id: String,

    #[arg(long, default_value = "channel")]
    channel_label: String,

    /// STUN server URL; repeat for several. Defaults to a public Google server.
    #[arg(long = "stun")]
    stun: Vec<String>,

    /// Negotiate data channels only, without a video m-line.
    #[arg(long)]
    no_video: bool,

    #[arg(long, default_value_t = 10)]
    connect_timeout_secs: u64,

    /// Used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn session_config(self) -> SessionConfig {
        let mut engine = EngineConfig::default();
        if !self.stun.is_empty() {
            engine.ice_servers = self.stun;
        }
        engine.video = !self.no_video;

        SessionConfig {
            relay: RelayConfig {
                url: self.relay_url,
                peer_id: PeerId::from(self.peer_id),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            },
            engine,
            control_channel_label: self.channel_label,
            ..SessionConfig::default()
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli) {
        Ok(reason) if reason.is_orderly() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ShutdownReason> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(async move {
        let orchestrator = SessionOrchestrator::new(cli.session_config());
        let shutdown = orchestrator.shutdown_signal();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, shutting down");
                    shutdown.trigger(ShutdownReason::Interrupted);
                }
                Err(e) => warn!("Unable to listen for Ctrl-C: {}", e),
            }
        });

        Ok(orchestrator.run().await)
    })
}
