//! hello-bench server binary
//!
//! Reads the listen port from the JSON file named by `HELLO_BENCH_CONFIG`
//! (default `hello_bench.json`), then serves `/plaintext` and `/json` until
//! Ctrl-C.

use hello_core::{Server, ServerConfig, ROUTES};
use std::process::ExitCode;
use tracing::{error, info};

// Use mimalloc for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    if let Err(e) = hello_core::telemetry::init_tracing("info") {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let config = ServerConfig::load_or_default(ServerConfig::path_from_env());

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers.max(1))
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("unable to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(config))
}

async fn run(config: ServerConfig) -> ExitCode {
    report(&config);

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            error!("unable to start server: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match server.local_addr() {
        Ok(addr) => info!("server listening on {}", addr),
        Err(e) => error!("listener has no local address: {}", e),
    }

    let served = server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("unable to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("shutdown requested");
        })
        .await;

    match served {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn report(config: &ServerConfig) {
    info!("hello-bench {}", env!("CARGO_PKG_VERSION"));
    info!(
        workers = config.workers,
        backlog = config.backlog,
        tcp_nodelay = config.tcp_nodelay,
        reuse_port = config.reuse_port,
        keep_alive = config.keep_alive,
        "runtime config"
    );
    for (path, outcome) in ROUTES {
        info!(%path, %outcome, "route");
    }
}
