//! # ordsync Client
//!
//! Session-authenticated RPC client for the storefront platform.
//!
//! This crate provides:
//! - `RpcTransport` — the transport abstraction (HTTP, loopback, mock)
//! - `SessionClient` — session lifecycle with re-login-on-expiry retry
//! - Typed wrappers for the storefront API surface
//!
//! ## Key Invariants
//!
//! - The session token is owned exclusively by `SessionClient` and is
//!   never persisted across process restarts
//! - A session-expired fault triggers exactly one re-login and retry per
//!   logical call; a second expiry surfaces as an error
//! - Logout on drop is best-effort and never escalates

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod session;
mod transport;

pub use error::{ClientError, ClientResult};
pub use session::{Credentials, InventorySyncResponse, SessionClient};
pub use transport::{MockTransport, RpcFault, RpcTransport, SESSION_EXPIRED};
