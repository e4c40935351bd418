//! xlsx2json API Server module
//!
//! HTTP front end for the converters.
//! Run with `xlsx2json serve`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig};
