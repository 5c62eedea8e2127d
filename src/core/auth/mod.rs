//! Authentication: password storage and role resolution

pub mod password;
pub mod resolver;

pub use password::PasswordHasher;
pub use resolver::{CredentialLookup, Resolution, RoleResolver, StoreLookup};
