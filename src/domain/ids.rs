//! Domain identifier types
//!
//! Newtype wrappers around database primary keys. Each table gets its own
//! surrogate key sequence, so a `ProfileId` only has meaning together with
//! the role whose table it came from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary key of a profile row (admin, patient, pharmacist or doctor)
///
/// # Examples
///
/// ```
/// use mediwise::domain::ids::ProfileId;
/// use std::str::FromStr;
///
/// let id = ProfileId::from_str("42").unwrap();
/// assert_eq!(id.value(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(i64);

impl ProfileId {
    /// Wraps a raw key
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw key
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProfileId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id: i64 = trimmed
            .parse()
            .map_err(|_| format!("Invalid profile id: '{trimmed}'"))?;
        if id <= 0 {
            return Err(format!("Invalid profile id: '{trimmed}'"));
        }
        Ok(Self(id))
    }
}

impl From<i64> for ProfileId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Primary key of an account tag row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountTagId(i64);

impl AccountTagId {
    /// Wraps a raw key
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw key
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountTagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AccountTagId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_id_from_str() {
        assert_eq!(ProfileId::from_str("7").unwrap(), ProfileId::new(7));
        assert_eq!(ProfileId::from_str(" 12 ").unwrap().value(), 12);
    }

    #[test]
    fn test_profile_id_rejects_garbage() {
        assert!(ProfileId::from_str("").is_err());
        assert!(ProfileId::from_str("abc").is_err());
        assert!(ProfileId::from_str("0").is_err());
        assert!(ProfileId::from_str("-3").is_err());
    }

    #[test]
    fn test_profile_id_serializes_as_number() {
        let json = serde_json::to_string(&ProfileId::new(5)).unwrap();
        assert_eq!(json, "5");
    }

    #[test]
    fn test_account_tag_id_display() {
        assert_eq!(AccountTagId::new(9).to_string(), "9");
    }
}
