//! Configuration for the healthdesk server.
//!
//! Loaded from a TOML file (default `config.toml`). Every section and field is
//! optional; missing values fall back to defaults that reproduce the stock
//! PowerShell deployment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub scripts: ScriptsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "127.0.0.1:5000"
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Allow any origin (the dashboard UI is served from a different port).
    #[serde(default = "default_true")]
    pub cors_permissive: bool,

    /// Hide script stderr/stdout from client-facing error messages.
    /// The full text is still logged.
    #[serde(default)]
    pub redact_script_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_permissive: true,
            redact_script_errors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Flat file holding the user list. Re-read on every login.
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,

    /// Role required by the administrative operations.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,

    /// When set, "any authenticated user" routes also require the bearer
    /// token to be a role known to the user store.
    #[serde(default)]
    pub strict_authenticated: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
            admin_role: default_admin_role(),
            strict_authenticated: false,
        }
    }
}

/// How the external scripts are launched.
///
/// A command line is `program program_args.. <script_dir>/<script> [action_flag action]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_program_args")]
    pub program_args: Vec<String>,

    #[serde(default = "default_script_dir")]
    pub script_dir: PathBuf,

    /// Script handling `healthcheck`, `installupdates` and `cleartemp`.
    #[serde(default = "default_health_check")]
    pub health_check: String,

    /// Parameterless script returning server details.
    #[serde(default = "default_server_details")]
    pub server_details: String,

    #[serde(default = "default_action_flag")]
    pub action_flag: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            program_args: default_program_args(),
            script_dir: default_script_dir(),
            health_check: default_health_check(),
            server_details: default_server_details(),
            action_flag: default_action_flag(),
        }
    }
}

impl ScriptsConfig {
    /// Full path of a script inside `script_dir`.
    pub fn script_path(&self, script: &str) -> PathBuf {
        self.script_dir.join(script)
    }
}

fn default_true() -> bool {
    true
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_users_file() -> PathBuf {
    PathBuf::from("users.json")
}

fn default_admin_role() -> String {
    "admin".to_string()
}

fn default_program() -> String {
    "powershell.exe".to_string()
}

fn default_program_args() -> Vec<String> {
    vec![
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-File".to_string(),
    ]
}

fn default_script_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_health_check() -> String {
    "HealthCheckScript.ps1".to_string()
}

fn default_server_details() -> String {
    "GetServerDetails.ps1".to_string()
}

fn default_action_flag() -> String {
    "-Action".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit path, or from `config.toml` when present.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.admin_role.trim().is_empty() {
            return Err(ConfigError::Config("auth.admin_role must not be empty".into()));
        }
        if self.scripts.program.trim().is_empty() {
            return Err(ConfigError::Config("scripts.program must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:5000");
        assert!(cfg.server.cors_permissive);
        assert!(!cfg.server.redact_script_errors);
        assert_eq!(cfg.auth.users_file, PathBuf::from("users.json"));
        assert_eq!(cfg.auth.admin_role, "admin");
        assert_eq!(cfg.scripts.program, "powershell.exe");
        assert_eq!(cfg.scripts.program_args, vec!["-ExecutionPolicy", "Bypass", "-File"]);
        assert_eq!(cfg.scripts.action_flag, "-Action");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            bind = "0.0.0.0:8080"

            [scripts]
            program = "/bin/sh"
            program_args = []
            script_dir = "/opt/healthdesk"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.bind, "0.0.0.0:8080");
        assert!(cfg.server.cors_permissive);
        assert_eq!(cfg.scripts.program, "/bin/sh");
        assert!(cfg.scripts.program_args.is_empty());
        assert_eq!(cfg.scripts.health_check, "HealthCheckScript.ps1");
        assert_eq!(
            cfg.scripts.script_path("GetServerDetails.ps1"),
            PathBuf::from("/opt/healthdesk/GetServerDetails.ps1")
        );
    }

    #[test]
    fn blank_admin_role_is_rejected() {
        let err = AppConfig::from_toml("[auth]\nadmin_role = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = AppConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[auth]\nstrict_authenticated = true\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert!(cfg.auth.strict_authenticated);
    }
}
