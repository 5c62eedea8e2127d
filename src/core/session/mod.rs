//! Session management
//!
//! [`SessionManager`] maps cookie tokens to a [`SessionState`] holding one
//! slot per role. Login writes a single slot; logout removes the whole entry.

pub mod manager;
pub mod state;

pub use manager::SessionManager;
pub use state::SessionState;
