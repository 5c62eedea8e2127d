//! Profile completeness
//!
//! A profile is incomplete when any of its role's required fields is null,
//! empty, or the literal string `"None"` (what a stringified null looks like
//! once it has round-tripped through a form). The result only drives a UI
//! prompt; it never gates access.

use crate::domain::{ProfileFields, Role};

pub const PATIENT_REQUIRED_FIELDS: &[&str] = &[
    "phone_number",
    "address",
    "date_of_birth",
    "blood_group",
    "height",
    "weight",
];

pub const DOCTOR_REQUIRED_FIELDS: &[&str] = &[
    "description",
    "profile_picture",
    "current_hospital",
    "license_number",
    "address",
];

pub const PHARMACIST_REQUIRED_FIELDS: &[&str] = &["phone_number", "address", "license_number"];

pub const ADMIN_REQUIRED_FIELDS: &[&str] = &[];

/// Required field names for a role
pub fn required_fields(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => ADMIN_REQUIRED_FIELDS,
        Role::Patient => PATIENT_REQUIRED_FIELDS,
        Role::Pharmacist => PHARMACIST_REQUIRED_FIELDS,
        Role::Doctor => DOCTOR_REQUIRED_FIELDS,
    }
}

fn is_missing(value: Option<&str>) -> bool {
    matches!(value, None | Some("") | Some("None"))
}

/// True when any named field is missing
///
/// Unknown field names count as missing.
pub fn is_incomplete<R: ProfileFields + ?Sized>(record: &R, required: &[&str]) -> bool {
    required
        .iter()
        .any(|name| is_missing(record.field_value(name).as_deref()))
}

/// Names of the missing fields, in `required` order
pub fn missing_fields<'a, R: ProfileFields + ?Sized>(record: &R, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|name| is_missing(record.field_value(name).as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::collections::HashMap;
    use test_case::test_case;

    struct Fields(HashMap<&'static str, Option<&'static str>>);

    impl ProfileFields for Fields {
        fn field_value(&self, name: &str) -> Option<Cow<'_, str>> {
            self.0.get(name).copied().flatten().map(Cow::Borrowed)
        }
    }

    fn single(value: Option<&'static str>) -> Fields {
        Fields(HashMap::from([("phone_number", value)]))
    }

    #[test_case(None, true ; "null is missing")]
    #[test_case(Some(""), true ; "empty string is missing")]
    #[test_case(Some("None"), true ; "literal None is missing")]
    #[test_case(Some("0"), false ; "zero is present")]
    #[test_case(Some("   "), false ; "whitespace is present")]
    #[test_case(Some("none"), false ; "lowercase none is present")]
    #[test_case(Some("555-0100"), false ; "value is present")]
    fn test_single_field(value: Option<&'static str>, incomplete: bool) {
        assert_eq!(is_incomplete(&single(value), &["phone_number"]), incomplete);
    }

    #[test]
    fn test_unknown_field_counts_as_missing() {
        let record = single(Some("555"));
        assert!(is_incomplete(&record, &["phone_number", "shoe_size"]));
        assert_eq!(missing_fields(&record, &["phone_number", "shoe_size"]), vec!["shoe_size"]);
    }

    #[test]
    fn test_no_required_fields_is_complete() {
        assert!(!is_incomplete(&single(None), ADMIN_REQUIRED_FIELDS));
    }

    #[test]
    fn test_required_field_sets() {
        assert_eq!(required_fields(Role::Patient).len(), 6);
        assert_eq!(required_fields(Role::Doctor).len(), 5);
        assert_eq!(required_fields(Role::Pharmacist).len(), 3);
        assert!(required_fields(Role::Admin).is_empty());
    }
}
