//! Operation dispatcher: run an operation's script and translate its output.

use crate::error::ApiError;
use crate::runner::ScriptRunner;
use crate::translate::{TranslateError, translate};
use healthdesk_core::OperationDescriptor;
use serde_json::Value;
use std::sync::Arc;

pub struct Dispatcher {
    runner: Arc<dyn ScriptRunner>,
    redact_errors: bool,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn ScriptRunner>, redact_errors: bool) -> Self {
        Self {
            runner,
            redact_errors,
        }
    }

    /// Invoke the script behind `descriptor` and wait for it to finish.
    ///
    /// Failures are logged in full here; what reaches the client depends on
    /// `redact_errors`.
    pub async fn dispatch(&self, descriptor: &OperationDescriptor) -> Result<Value, ApiError> {
        let operation = descriptor.operation;

        let output = match self.runner.run(&descriptor.command).await {
            Ok(output) => output,
            Err(err) => {
                tracing::error!(%operation, error = %err, "script could not be started");
                return Err(ApiError::from_run(err, self.redact_errors));
            }
        };

        match translate(output) {
            Ok(body) => {
                tracing::info!(%operation, "operation completed");
                Ok(body)
            }
            Err(err) => {
                match &err {
                    TranslateError::Execution { exit_code, stderr } => tracing::warn!(
                        %operation,
                        exit_code = ?exit_code,
                        stderr = %stderr.trim(),
                        "script failed"
                    ),
                    TranslateError::Parse { raw, source } => tracing::warn!(
                        %operation,
                        error = %source,
                        output = %raw,
                        "script output is not valid JSON"
                    ),
                }
                Err(ApiError::from_translate(err, self.redact_errors))
            }
        }
    }
}
