//! Headless client for the Colombia team site.
//!
//! The pieces stack the same way the screens do: [`session::SessionStore`]
//! decides whether anyone is logged in, [`membership::MembershipGate`] picks
//! between the join flow, the pending screen and the dashboard,
//! [`dashboard::Dashboard`] owns tab selection, and [`chat::ChatView`] keeps
//! the message list fresh while mounted.

pub mod api;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod membership;
pub mod session;
pub mod slot;

pub use api::ApiClient;
pub use error::ClientError;
