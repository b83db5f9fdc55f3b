//! Application services and ports.

#![forbid(unsafe_code)]

mod directory_ports;
pub mod permission_gate;
mod session_service;
mod token_ports;

pub use directory_ports::DirectoryClient;
pub use session_service::{LoginOutcome, MissingSubjectPolicy, SessionService};
pub use token_ports::TokenCodec;
