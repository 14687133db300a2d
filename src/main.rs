//! cycle-coordinator - track scholarship cycles, milestones and notes
//!
//! One command per invocation: parse argv, load configuration, open the
//! configured store, run the command, exit 0 on success and 1 otherwise.

use std::process::ExitCode;

use cycle_coordinator::adapters::cli::{App, Dispatch, Output};
use cycle_coordinator::adapters::{InMemoryCycleStore, PostgresCycleStore};
use cycle_coordinator::config::{AppConfig, StoreBackend};
use cycle_coordinator::domain::foundation::DomainError;
use cycle_coordinator::ports::CycleStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let mut app = App::new(Output::stdout());

    // Help and usage errors never need configuration or a connection.
    let command = match app.parse(std::env::args_os()) {
        Dispatch::Run(command) => command,
        Dispatch::Exit(code) => return exit_code(code),
    };

    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(e) => return exit_code(app.fail(e)),
    };

    init_tracing(&config);

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(e) => return exit_code(app.fail(e)),
    };

    exit_code(app.execute(command, store.as_ref()).await)
}

fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.env_filter())
        .with_writer(std::io::stderr)
        .init();
}

async fn open_store(config: &AppConfig) -> Result<Box<dyn CycleStore>, DomainError> {
    match config.store.backend {
        StoreBackend::Postgres => Ok(Box::new(PostgresCycleStore::connect(&config.database).await?)),
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; nothing will be persisted");
            Ok(Box::new(InMemoryCycleStore::new()))
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
