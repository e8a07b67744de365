//! HTTP API layer for the TechSprint registration backend.
//!
//! - **Endpoints**: public registration flow, admin auth, verification
//!   console, management console
//! - **Extractors**: admin authentication and role gating
//! - **Middleware**: bearer-token session lookup
//! - **SSE**: registrant change events for the admin consoles
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod sse;

pub use endpoints::router;
