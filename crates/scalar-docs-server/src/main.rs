//! scalar-docs demo server.
//!
//! Serves a small application wrapped in the Scalar docs middleware, or
//! reports what auto-discovery finds.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hyper::body::Incoming;
use tokio::net::TcpListener;
use tower::Layer;

use scalar_docs::{AutoDiscovery, DocsConfig, InitOutcome};
use scalar_docs_server::app::{build_layer, hello_world, spec_fs};
use scalar_docs_server::cli::{Cli, Commands, ServeArgs};
use scalar_docs_server::server::serve;
use scalar_docs_server::{ServerConfig, ServerError};
use scalar_docs_telemetry::{init_logging, log_listening, log_startup};

/// Run the serve command.
async fn run_serve(args: ServeArgs) -> ExitCode {
    match serve_until_shutdown(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn serve_until_shutdown(args: ServeArgs) -> Result<(), ServerError> {
    let file_config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let config = args.apply(file_config);

    let telemetry = config.telemetry();
    init_logging(&telemetry)?;
    log_startup!(
        service = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        auto = config.auto,
        docs_path = %config.docs.docs_path,
        "starting"
    );

    let addr = config.listen_addr()?;

    // Discover before accepting connections so problems show up at startup.
    // Runs on the blocking pool.
    let layer = build_layer(&config);
    let outcome = layer.initializer().outcome().await;
    if let InitOutcome::Failed(e) = outcome.as_ref() {
        tracing::warn!(error = %e, "docs UI will answer 500 until restarted");
    }

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    log_listening!(addr = %addr, "listening");

    let service = layer.layer(tower::service_fn(hello_world::<Incoming>));
    serve(listener, service, shutdown_signal()).await;

    Ok(())
}

/// Resolves on ctrl-c. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}

/// Run the discover command.
fn run_discover(search_dirs: Vec<PathBuf>, root: Option<PathBuf>) -> ExitCode {
    let config = ServerConfig {
        root,
        ..Default::default()
    };
    let dirs = if search_dirs.is_empty() {
        DocsConfig::auto_search_dirs()
    } else {
        search_dirs
    };

    let fs = spec_fs(&config);
    let discovery = AutoDiscovery::run(fs.as_ref(), &dirs);

    if discovery.is_initialized() {
        println!("Discovered OpenAPI spec files:");
        for (i, file) in discovery.found_files().iter().enumerate() {
            if i == 0 {
                println!("  - {} (selected)", file.display());
            } else {
                println!("  - {}", file.display());
            }
        }
        ExitCode::SUCCESS
    } else if let Some(e) = discovery.error() {
        eprintln!("error: {}", e);
        ExitCode::from(1)
    } else {
        eprintln!("no valid OpenAPI spec file found");
        ExitCode::from(1)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Discover { search_dirs, root } => run_discover(search_dirs, root),
    }
}
