//! HTTP surface
//!
//! - `GET /concordances` resolves by `conceptId` or by `authority` + `identifierValue`
//! - `GET /__health`, `GET /__gtg` report graph store connectivity
//! - `GET /__build-info`, `GET /build-info` report the crate version
//! - `GET /__api` serves the API description when one was loaded

pub mod handlers;
pub mod health;
pub mod router;

pub use router::{build_router, AppState};
