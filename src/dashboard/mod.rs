//! Per-browser dashboard sessions.
//!
//! Each session owns a [`DashboardState`] that only changes through its
//! reducers. Every trigger (mount, geolocation, search, map click) takes a
//! new generation; a result is applied only if no newer trigger started
//! while it was in flight, so the last user action always wins.

pub mod handlers;
mod service;
mod state;
mod view;

pub use service::{DashboardError, DashboardService, SessionStore};
pub use state::{FetchFailure, Phase};
pub use view::{DashboardView, ViewSettings};
