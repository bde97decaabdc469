//! Decision service wire contract and submission client.

mod client;
mod error;
mod types;

pub use client::CoachClient;
pub use error::{CoachError, ErrorKind};
pub use types::*;
