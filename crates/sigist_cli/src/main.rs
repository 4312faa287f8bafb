//! `sigist` binary: runs one of the HTTP services or probes the core crate.

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use sigist_core::{init_logging, Environment, ServiceConfig, ServiceKind};
use sigist_http::{serve, AppState, StartupError};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "sigist", version, about = "Feedback, users and email signup services")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve one service kind over HTTP.
    Serve(ServeArgs),
    /// Print core ping and version.
    Ping,
}

#[derive(Args, Clone, Debug)]
struct ServeArgs {
    /// prod | dev | test
    #[arg(long, default_value = "dev", env = "ENVIRONMENT")]
    env: Environment,
    /// feedback | users | email
    #[arg(long, default_value = "feedback", env = "SERVICE_KIND")]
    kind: ServiceKind,
    #[arg(long, default_value_t = 8080, env = "PORT")]
    port: u16,
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,
    /// Directory for rotating log files in prod.
    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[arg(long, default_value = "user-feedback.sqlite", env = "DB_FILE")]
    db_file: PathBuf,
    #[arg(long, default_value = "data-pipe", env = "EVENT_TOPIC")]
    event_topic: String,
    /// Append published events to this JSON-lines file instead of the log.
    #[arg(long, env = "EVENT_SINK")]
    event_sink: Option<PathBuf>,
}

impl From<ServeArgs> for ServiceConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            env: args.env,
            kind: args.kind,
            port: args.port,
            log_level: args.log_level,
            log_dir: args.log_dir,
            db_file: args.db_file,
            event_topic: args.event_topic,
            event_sink: args.event_sink,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ping => {
            println!("sigist_core ping={}", sigist_core::ping());
            println!("sigist_core version={}", sigist_core::core_version());
        }
        Commands::Serve(args) => {
            let config = ServiceConfig::from(args);
            if let Err(err) = config.validate() {
                eprintln!("invalid configuration: {err}");
                std::process::exit(1);
            }
            if let Err(err) =
                init_logging(&config.log_level, config.env, config.log_dir.as_deref())
            {
                eprintln!("failed to initialize logging: {err}");
                std::process::exit(1);
            }
            if let Err(err) = run(&config).await {
                error!("event=startup module=cli status=error error={err}");
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}

async fn run(config: &ServiceConfig) -> Result<(), StartupError> {
    let state = AppState::open(config)?;
    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .map_err(StartupError::Bind)?;
    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("event=shutdown module=cli status=start signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown module=cli status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown module=cli status=start signal=terminate");
            }
            Err(err) => {
                error!("event=shutdown module=cli status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
