//! WIPR performance scoring: a deterministic score engine plus the service and
//! HTTP plumbing that persists weekly evaluations behind storage traits.
//!
//! The computational core lives in [`scoring::engine`] and is a pure function
//! from a validated [`scoring::ScoreRequest`] to a [`scoring::ScoreBreakdown`].
//! Everything else in this crate is glue: typed domain structs, repository
//! abstractions so storage can be swapped in tests, a service facade, and an
//! axum router exposing the `/api/*` surface.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
