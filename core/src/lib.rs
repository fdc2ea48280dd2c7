//! Client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sits
//! [`TodoSyncController`], which keeps a local snapshot of the todo list in
//! step with the server and turns every outcome into user feedback.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`; a [`Transport`]
//!   performs the round trip in between.
//! - Collaborators the views provide (toasts, confirmation prompts, session
//!   storage) are traits injected into the controller and auth flow.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod confirm;
pub mod error;
pub mod http;
pub mod notify;
pub mod session;
pub mod sync;
pub mod transport;
pub mod types;

pub use auth::{AuthFlow, Route};
pub use client::TodoClient;
pub use config::{ClientConfig, ConfigError};
pub use confirm::{Confirm, FixedAnswer};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier};
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
pub use sync::{Outcome, TodoSyncController};
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateTodo, LoginRequest, LoginResponse, TodoId, TodoItem, UpdateTodo};
