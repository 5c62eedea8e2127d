//! HTML rendering through tera
//!
//! Templates are compiled into the binary and parsed once at startup.

use super::error::WebResult;
use crate::core::forms::FormFields;
use crate::domain::{BloodGroup, Gender, ProfileFields, ValidationErrors};
use axum::response::Html;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("macros.html", include_str!("../../templates/macros.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("register.html", include_str!("../../templates/register.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    (
        "patient/profile.html",
        include_str!("../../templates/patient/profile.html"),
    ),
    (
        "pharmacist/profile.html",
        include_str!("../../templates/pharmacist/profile.html"),
    ),
    (
        "doctor/profile.html",
        include_str!("../../templates/doctor/profile.html"),
    ),
    (
        "admin/dashboard.html",
        include_str!("../../templates/admin/dashboard.html"),
    ),
    (
        "admin/profile.html",
        include_str!("../../templates/admin/profile.html"),
    ),
    (
        "admin/doctors.html",
        include_str!("../../templates/admin/doctors.html"),
    ),
];

/// `<select>` option
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

pub fn gender_choices() -> Vec<Choice> {
    Gender::ALL
        .iter()
        .map(|g| Choice {
            value: g.as_str().to_string(),
            label: g.label().to_string(),
        })
        .collect()
}

pub fn blood_group_choices() -> Vec<Choice> {
    BloodGroup::ALL
        .iter()
        .map(|b| Choice {
            value: b.as_str().to_string(),
            label: b.label(),
        })
        .collect()
}

/// Form values keyed by field name, with every field of the form present
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    /// Blank values for `names`
    pub fn blank(names: &[&str]) -> Self {
        Self(
            names
                .iter()
                .map(|name| (name.to_string(), String::new()))
                .collect(),
        )
    }

    /// Current values of `record` for `names`
    pub fn from_record<R: ProfileFields + ?Sized>(record: &R, names: &[&str]) -> Self {
        Self(
            names
                .iter()
                .map(|name| {
                    let value = record.field_value(name).map(|v| v.into_owned());
                    (name.to_string(), value.unwrap_or_default())
                })
                .collect(),
        )
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }

    /// Submitted values (passwords dropped) over blanks for `names`
    pub fn submitted(names: &[&str], fields: &FormFields) -> Self {
        let mut values = Self::blank(names);
        values.0.extend(fields.redisplay());
        values
    }
}

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// # Errors
    ///
    /// Fails when a template does not parse.
    pub fn new() -> crate::domain::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .map_err(|e| crate::domain::PortalError::Template(e.to_string()))?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> WebResult<Html<String>> {
        Ok(Html(self.tera.render(name, context)?))
    }
}

/// Base context for a form page
pub fn form_context(values: &FormValues, errors: Option<&ValidationErrors>) -> Context {
    let mut context = Context::new();
    context.insert("values", values);
    let empty = ValidationErrors::new();
    context.insert("errors", errors.unwrap_or(&empty).as_map());
    context.insert("genders", &gender_choices());
    context.insert("blood_groups", &blood_group_choices());
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PatientProfile, ProfileId};

    fn patient() -> PatientProfile {
        PatientProfile {
            id: ProfileId::new(1),
            account_tag: None,
            first_name: "Ann".to_string(),
            last_name: "<Lee>".to_string(),
            password: "x".to_string(),
            gender: Some(Gender::Female),
            blood_group: None,
            date_of_birth: None,
            phone_number: None,
            height: None,
            weight: None,
            email: Some("a@x.com".to_string()),
            address: None,
        }
    }

    #[test]
    fn test_all_templates_parse() {
        let renderer = Renderer::new().unwrap();
        let names: Vec<&str> = renderer.tera.get_template_names().collect();
        for (name, _) in TEMPLATES {
            assert!(names.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_values_from_record_fill_missing_with_blank() {
        let values = FormValues::from_record(&patient(), &["first_name", "height", "gender"]);
        assert_eq!(values.0["first_name"], "Ann");
        assert_eq!(values.0["height"], "");
        assert_eq!(values.0["gender"], "female");
    }

    #[test]
    fn test_submitted_values_drop_passwords() {
        let fields = FormFields::new()
            .with("email", "a@x.com")
            .with("password", "secret123");
        let values = FormValues::submitted(&["email", "password", "first_name"], &fields);
        assert_eq!(values.0["email"], "a@x.com");
        assert_eq!(values.0["password"], "");
        assert_eq!(values.0["first_name"], "");
    }

    #[test]
    fn test_profile_page_escapes_values_and_shows_errors() {
        let renderer = Renderer::new().unwrap();
        let record = patient();
        let values = FormValues::from_record(
            &record,
            &[
                "first_name",
                "last_name",
                "email",
                "gender",
                "phone_number",
                "address",
                "date_of_birth",
                "blood_group",
                "height",
                "weight",
            ],
        );
        let errors = ValidationErrors::single("height", "This field is required.");
        let mut context = form_context(&values, Some(&errors));
        context.insert("user", &record);
        context.insert("full_name", &record.full_name());

        let html = renderer.render("patient/profile.html", &context).unwrap().0;
        assert!(html.contains("&lt;Lee&gt;"));
        assert!(!html.contains("<Lee>"));
        assert!(html.contains("This field is required."));
        assert!(html.contains(r#"value="female" selected"#));
    }
}
