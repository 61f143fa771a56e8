//! slotwatch entry point

use clap::Parser;
use slotwatch::cli::Cli;
use slotwatch::config::probe_config_from_env;
use slotwatch::logging;
use slotwatch::monitor::SlotMonitor;
use slotwatch::nodes::load_endpoints;
use slotwatch::report::StatusDisplay;
use slotwatch::rpc::RpcClient;
use slotwatch::shutdown::ShutdownController;
use tracing::{info, warn};

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    let config = cli.apply(probe_config_from_env());
    if let Err(e) = config.validate() {
        fail(e);
    }

    let targets = match load_endpoints(&config.nodes_path) {
        Ok(targets) => targets,
        Err(e) => fail(e),
    };

    let client = match RpcClient::new(config.request_timeout()) {
        Ok(client) => client,
        Err(e) => fail(e),
    };

    let display = StatusDisplay::new(
        config.clear_screen,
        cli.format,
        config.reference_label.clone(),
    );
    let monitor = SlotMonitor::new(client, targets, config);
    info!(
        targets = monitor.targets().len(),
        lag_log = %monitor.lag_log().path().display(),
        "Monitor configured"
    );

    if cli.once {
        let report = monitor.run_tick().await;
        display.show(&report);
        return;
    }

    let shutdown = ShutdownController::default();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown signal received");
                    shutdown.request_shutdown();
                }
                Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
            }
        });
    }

    monitor.run(&shutdown, &display).await;
}
