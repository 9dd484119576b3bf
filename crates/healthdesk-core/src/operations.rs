//! Static operation table.
//!
//! Each externally visible operation maps to an HTTP route, an access rule and
//! the command line of the script that performs it. The table is built once at
//! startup from configuration and never mutated.

use crate::access::AccessRule;
use crate::config::AppConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    HealthCheck,
    InstallUpdates,
    ClearTemp,
    ServerDetails,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::HealthCheck,
        Operation::InstallUpdates,
        Operation::ClearTemp,
        Operation::ServerDetails,
    ];

    /// Public name. Doubles as the `-Action` value for the health-check script.
    pub fn name(self) -> &'static str {
        match self {
            Operation::HealthCheck => "healthcheck",
            Operation::InstallUpdates => "installupdates",
            Operation::ClearTemp => "cleartemp",
            Operation::ServerDetails => "serverdetails",
        }
    }

    pub fn path(self) -> String {
        format!("/api/{}", self.name())
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Operation::HealthCheck | Operation::ServerDetails => HttpMethod::Get,
            Operation::InstallUpdates | Operation::ClearTemp => HttpMethod::Post,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// Program plus arguments, executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation: Operation,
    pub method: HttpMethod,
    pub path: String,
    pub access: AccessRule,
    pub command: CommandLine,
}

#[derive(Debug, Clone)]
pub struct OperationTable {
    descriptors: Vec<OperationDescriptor>,
}

impl OperationTable {
    pub fn from_config(cfg: &AppConfig) -> Self {
        let scripts = &cfg.scripts;
        let admin = AccessRule::Role(cfg.auth.admin_role.clone());
        let any_user = if cfg.auth.strict_authenticated {
            AccessRule::VerifiedAuthenticated
        } else {
            AccessRule::Authenticated
        };

        let command_for = |script: &str, action: Option<Operation>| {
            let mut args = scripts.program_args.clone();
            args.push(scripts.script_path(script).to_string_lossy().into_owned());
            if let Some(action) = action {
                args.push(scripts.action_flag.clone());
                args.push(action.name().to_string());
            }
            CommandLine {
                program: scripts.program.clone(),
                args,
            }
        };

        let descriptors = Operation::ALL
            .into_iter()
            .map(|operation| {
                let (access, command) = match operation {
                    Operation::ServerDetails => {
                        (any_user.clone(), command_for(&scripts.server_details, None))
                    }
                    action => (admin.clone(), command_for(&scripts.health_check, Some(action))),
                };
                OperationDescriptor {
                    operation,
                    method: operation.method(),
                    path: operation.path(),
                    access,
                    command,
                }
            })
            .collect();

        Self { descriptors }
    }

    pub fn get(&self, operation: Operation) -> Option<&OperationDescriptor> {
        self.descriptors.iter().find(|d| d.operation == operation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.descriptors.iter()
    }
}
