//! Form payloads as they arrive from the presentation layer, and the validated
//! inputs the portal accepts.

use chapter_portal_database::models::{Category, NewEvent, UnknownCategory};
use serde::Deserialize;

pub const DEFAULT_EVENT_IMAGE: &str =
    "https://images.pexels.com/photos/3184298/pexels-photo-3184298.jpeg";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in the {0} field.")]
    MissingField(&'static str),
    #[error("{0:?} is not a valid email address.")]
    InvalidEmail(String),
    #[error("Capacity must be a positive number.")]
    InvalidCapacity,
    #[error("{0}")]
    UnknownCategory(#[from] UnknownCategory),
}

fn required(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_owned()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Admin,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub ieee_id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub as_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub(crate) ieee_id: String,
    pub(crate) password: String,
    pub(crate) role: Role,
}

impl LoginInput {
    /// The password is not validated here: whether it is needed depends on the role
    /// and on the portal's policy.
    pub fn new(
        ieee_id: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            ieee_id: required(ieee_id.into(), "IEEE ID")?,
            password: password.into(),
            role,
        })
    }

    #[must_use]
    pub fn ieee_id(&self) -> &str {
        &self.ieee_id
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

impl LoginForm {
    pub fn validate(self) -> Result<LoginInput, ValidationError> {
        let role = if self.as_admin {
            Role::Admin
        } else {
            Role::Student
        };
        LoginInput::new(self.ieee_id, self.password, role)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub ieee_id: String,
    pub full_name: String,
    pub email: String,
    pub branch: String,
    pub year: String,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupInput {
    pub(crate) ieee_id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) branch: String,
    pub(crate) year: String,
    pub(crate) password: Option<String>,
}

impl SignupForm {
    pub fn validate(self) -> Result<SignupInput, ValidationError> {
        let ieee_id = required(self.ieee_id, "IEEE ID")?;
        let full_name = required(self.full_name, "full name")?;
        let email = required(self.email, "email")?;
        let branch = required(self.branch, "branch")?;
        let year = required(self.year, "year")?;
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(ValidationError::InvalidEmail(email)),
        }
        Ok(SignupInput {
            ieee_id,
            full_name,
            email,
            branch,
            year,
            password: self.password.filter(|password| !password.is_empty()),
        })
    }
}

/// The "Add Event" form. Numbers arrive unparsed-ish from the browser, so capacity
/// is signed and checked here.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    pub description: String,
    #[serde(alias = "society")]
    pub category: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    #[serde(default)]
    pub image: String,
    pub capacity: i64,
    /// Comma separated.
    #[serde(default)]
    pub tags: String,
}

impl EventForm {
    pub fn validate(self) -> Result<NewEvent, ValidationError> {
        let title = required(self.title, "title")?;
        let description = required(self.description, "description")?;
        let category: Category = self.category.parse()?;
        let date = required(self.date, "date")?;
        let time = required(self.time, "time")?;
        let venue = required(self.venue, "venue")?;
        let capacity = u32::try_from(self.capacity)
            .ok()
            .filter(|capacity| *capacity > 0)
            .ok_or(ValidationError::InvalidCapacity)?;
        let image = if self.image.trim().is_empty() {
            DEFAULT_EVENT_IMAGE.to_owned()
        } else {
            self.image.trim().to_owned()
        };
        let tags = self
            .tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Ok(NewEvent {
            title,
            description,
            category,
            date,
            time,
            venue,
            image,
            capacity,
            tags,
            is_past: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_form() -> SignupForm {
        SignupForm {
            ieee_id: " IEEE2024100 ".to_owned(),
            full_name: "Meera Nair".to_owned(),
            email: "meera@student.example.edu".to_owned(),
            branch: "Electrical".to_owned(),
            year: "1st Year".to_owned(),
            password: Some(String::new()),
        }
    }

    fn event_form() -> EventForm {
        EventForm {
            title: "PCB Design Bootcamp".to_owned(),
            description: "From schematic to gerber files.".to_owned(),
            category: "WIE".to_owned(),
            date: "2026-12-01".to_owned(),
            time: "10:00 AM".to_owned(),
            venue: "Lab 2".to_owned(),
            image: String::new(),
            capacity: 50,
            tags: "hardware, , PCB ,design".to_owned(),
        }
    }

    #[test]
    fn signup_trims_and_drops_empty_password() {
        let input = signup_form().validate().unwrap();
        assert_eq!(input.ieee_id, "IEEE2024100");
        assert_eq!(input.password, None);
    }

    #[test]
    fn signup_requires_every_field() {
        let form = SignupForm {
            branch: "   ".to_owned(),
            ..signup_form()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField("branch"))
        );
    }

    #[test]
    fn signup_rejects_email_without_at() {
        let form = SignupForm {
            email: "meera.example.edu".to_owned(),
            ..signup_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn login_form_selects_role() {
        let form: LoginForm =
            serde_json::from_str(r#"{"ieeeId":"ADMIN001","password":"pw","asAdmin":true}"#)
                .unwrap();
        let input = form.validate().unwrap();
        assert_eq!(input.role(), Role::Admin);
        assert_eq!(input.ieee_id(), "ADMIN001");

        assert_eq!(
            LoginInput::new("", "pw", Role::Student),
            Err(ValidationError::MissingField("IEEE ID"))
        );
    }

    #[test]
    fn event_form_fills_defaults() {
        let event = event_form().validate().unwrap();
        assert_eq!(event.category, Category::Wie);
        assert_eq!(event.image, DEFAULT_EVENT_IMAGE);
        assert_eq!(event.tags, vec!["hardware", "PCB", "design"]);
        assert!(!event.is_past);
        assert_eq!(event.capacity, 50);
    }

    #[test]
    fn event_form_rejects_bad_capacity_and_category() {
        for capacity in [0, -5, i64::from(u32::MAX) + 1] {
            let form = EventForm {
                capacity,
                ..event_form()
            };
            assert_eq!(form.validate(), Err(ValidationError::InvalidCapacity));
        }
        let form = EventForm {
            category: "Robotics".to_owned(),
            ..event_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::UnknownCategory(_))
        ));
    }
}
