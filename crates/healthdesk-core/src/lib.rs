//! # healthdesk-core
//!
//! Domain types for the healthdesk admin server, free of any HTTP dependency:
//!
//! - [`config`]: TOML configuration
//! - [`users`]: flat-file credential store and authenticator
//! - [`access`]: bearer-token authorization gate
//! - [`operations`]: static table mapping operations to routes, roles and scripts

pub mod access;
pub mod config;
pub mod operations;
pub mod users;

pub use access::{AccessError, AccessRule, Grant, authorize};
pub use config::{AppConfig, AuthConfig, ConfigError, ScriptsConfig, ServerConfig};
pub use operations::{CommandLine, HttpMethod, Operation, OperationDescriptor, OperationTable};
pub use users::{FileUserStore, Session, StaticUserStore, StoreError, UserRecord, UserStore};
