use std::process::ExitCode;

use configs::AppConfig;
use tokio::runtime::{Builder, Runtime};
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // .env must be loaded before RUST_LOG and LOG_FORMAT are read
    dotenvy::dotenv().ok();
    match std::env::var("LOG_FORMAT") {
        Ok(f) if f.eq_ignore_ascii_case("json") => common::utils::logging::init_logging_json(),
        _ => common::utils::logging::init_logging_default(),
    }
}

fn runtime_for(cfg: &AppConfig) -> std::io::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();
    builder.enable_all().thread_name("consultsite-worker");
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

fn main() -> ExitCode {
    init_logging();
    let instance = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |panic| {
        error!(%instance, event = "panic", message = %panic, "panicked");
    }));

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(event = "config_rejected", error = %e, "refusing to start");
            return ExitCode::FAILURE;
        }
    };
    let rt = match runtime_for(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_failed", error = %e, "could not build the async runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        %instance,
        version = env!("CARGO_PKG_VERSION"),
        workers = cfg.server.worker_threads.unwrap_or_default(),
        ai_configured = cfg.ai.is_configured(),
        "consultsite starting"
    );
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(%instance, event = "stop", "consultsite stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(%instance, event = "run_failed", error = %e, "consultsite exited with an error");
            ExitCode::FAILURE
        }
    }
}
