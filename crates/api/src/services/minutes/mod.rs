//! Meeting minutes (MOM) generation.
//!
//! Admins paste raw notes from a meeting with a startup; the notes are sent
//! to Gemini with a prompt asking for structured minutes.

mod client;
mod error;
mod types;

pub use client::MinutesClient;
pub use error::MinutesError;
pub use types::MinutesRequest;
