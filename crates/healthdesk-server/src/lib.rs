//! # healthdesk-server
//!
//! HTTP front end for server administration scripts.
//!
//! Requests pass through the authorization gate, the mapped script runs to
//! completion, and its JSON output becomes the response body:
//!
//! | Method | Path                  | Access              |
//! |--------|-----------------------|---------------------|
//! | POST   | `/api/login`          | none                |
//! | GET    | `/api/healthcheck`    | admin role          |
//! | POST   | `/api/installupdates` | admin role          |
//! | POST   | `/api/cleartemp`      | admin role          |
//! | GET    | `/api/serverdetails`  | any credential      |
//! | GET    | `/healthz`            | none                |

pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod runner;
pub mod server;
pub mod state;
pub mod translate;

pub use error::ApiError;
pub use routes::create_router;
pub use runner::{ProcessRunner, ScriptOutput, ScriptRunner};
pub use server::HealthdeskServer;
pub use state::AppState;
