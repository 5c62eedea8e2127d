//! Fixed choice sets used by profile fields

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("{s} is not one of the available choices."))
    }
}

/// ABO/Rh blood group choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "o+")]
    OPositive,
    #[serde(rename = "o-")]
    ONegative,
    #[serde(rename = "a+")]
    APositive,
    #[serde(rename = "a-")]
    ANegative,
    #[serde(rename = "b+")]
    BPositive,
    #[serde(rename = "b-")]
    BNegative,
    #[serde(rename = "ab+")]
    AbPositive,
    #[serde(rename = "ab-")]
    AbNegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::OPositive,
        BloodGroup::ONegative,
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::OPositive => "o+",
            BloodGroup::ONegative => "o-",
            BloodGroup::APositive => "a+",
            BloodGroup::ANegative => "a-",
            BloodGroup::BPositive => "b+",
            BloodGroup::BNegative => "b-",
            BloodGroup::AbPositive => "ab+",
            BloodGroup::AbNegative => "ab-",
        }
    }

    /// Display label, e.g. `AB+`
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodGroup::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("{s} is not one of the available choices."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse() {
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("Female".parse::<Gender>().is_err());
    }

    #[test]
    fn test_blood_group_parse_and_label() {
        let group: BloodGroup = "ab-".parse().unwrap();
        assert_eq!(group, BloodGroup::AbNegative);
        assert_eq!(group.label(), "AB-");
        assert!("c+".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn test_blood_group_serde_uses_stored_value() {
        let json = serde_json::to_string(&BloodGroup::OPositive).unwrap();
        assert_eq!(json, "\"o+\"");
    }
}
