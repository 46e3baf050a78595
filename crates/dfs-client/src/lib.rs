//! Terminal front end for the lineup optimizer API.

pub mod client;
pub mod render;
pub mod session;

pub use client::{ClientError, OptimizerClient};
pub use session::{Session, run_interactive};
