//! Registration of self-service accounts

pub mod flow;

pub use flow::{RegistrationFlow, INVALID_ROLE};
