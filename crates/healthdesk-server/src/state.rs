use crate::dispatch::Dispatcher;
use crate::runner::{ProcessRunner, ScriptRunner};
use healthdesk_core::{AppConfig, FileUserStore, OperationTable, UserStore};
use std::sync::Arc;

/// Shared application state. Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub operations: Arc<OperationTable>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Production wiring: user file from config, scripts run as child processes.
    pub fn from_config(config: AppConfig) -> Self {
        let users = Arc::new(FileUserStore::new(config.auth.users_file.clone()));
        Self::with_parts(config, users, Arc::new(ProcessRunner))
    }

    pub fn with_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        runner: Arc<dyn ScriptRunner>,
    ) -> Self {
        let operations = Arc::new(OperationTable::from_config(&config));
        let dispatcher = Arc::new(Dispatcher::new(runner, config.server.redact_script_errors));
        Self {
            config: Arc::new(config),
            users,
            operations,
            dispatcher,
        }
    }
}
