/// Form payloads and their validation rules
///
/// Field names match the HTML rendered by [`crate::views`]. Every field
/// defaults to empty so a missing field is reported as a validation error
/// instead of an extractor rejection.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::session::Session;

/// Message for a blank required field
pub const REQUIRED: &str = "This field is required.";

/// Message shown when the submitted CSRF token does not match the session
pub const CSRF_INVALID: &str = "The CSRF token is invalid.";

/// Message for a username that is already registered
pub const DUPLICATE_USERNAME: &str = "User already exists, please choose a different username.";

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the messages produced by a `validator` derive
    pub fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        let Err(e) = result else {
            return Self::new();
        };

        let mut errors = Self::new();
        e.field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| {
                    (
                        field.to_string(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Invalid value.".to_string()),
                    )
                })
            })
            .for_each(|(field, message)| errors.add(&field, message));
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// Marks a blank field as missing, replacing any other message for it
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.0.insert(field.to_string(), vec![REQUIRED.to_string()]);
        }
    }

    pub fn check_csrf(&mut self, session: &Session, submitted: &str) {
        if !session.verify_csrf(submitted) {
            self.add("csrf_token", CSRF_INVALID);
        }
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Registration form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(length(min = 3, max = 20, message = "Field must be between 3 and 20 characters long."))]
    pub username: String,

    pub password: String,

    /// Password confirmation
    pub password2: String,

    pub csrf_token: String,
}

impl RegisterForm {
    pub fn check(&self, session: &Session) -> FieldErrors {
        let mut errors = FieldErrors::from_validation(self.validate());
        errors.require("username", &self.username);
        errors.require("password", &self.password);
        errors.require("password2", &self.password2);

        if !self.password2.trim().is_empty() && self.password2 != self.password {
            errors.add("password2", "Field must be equal to password.");
        }

        errors.check_csrf(session, &self.csrf_token);
        errors
    }
}

/// Login form
///
/// Failures are never explained to the visitor, so this only answers
/// yes or no.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,

    pub csrf_token: String,
}

impl LoginForm {
    pub fn is_acceptable(&self, session: &Session) -> bool {
        self.validate().is_ok()
            && !self.username.trim().is_empty()
            && session.verify_csrf(&self.csrf_token)
    }
}

/// New todo list form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateListForm {
    #[validate(length(min = 1, max = 200, message = "Field must be between 1 and 200 characters long."))]
    pub name: String,

    pub csrf_token: String,
}

impl CreateListForm {
    pub fn check(&self, session: &Session) -> FieldErrors {
        let mut errors = FieldErrors::from_validation(self.validate());
        errors.require("name", &self.name);
        errors.check_csrf(session, &self.csrf_token);
        errors
    }
}

/// What a POST to a list page asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// Overwrite completion: items in `completed` are done, all others are not
    Save { completed: HashSet<i64> },

    /// Append an item
    AddItem { text: String },

    /// Neither button was pressed
    Nothing,
}

/// A decoded list page submission
#[derive(Debug, Clone)]
pub struct ListSubmission {
    pub action: ListAction,
    pub csrf_token: String,
}

impl ListSubmission {
    /// Decodes the raw form fields
    ///
    /// `save` wins over `newItem` when both are present. Checkboxes are named
    /// `c<item id>` and only count when their value is `clicked`.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let pressed = |name: &str| fields.get(name).is_some_and(|v| !v.is_empty());

        let action = if pressed("save") {
            let completed = fields
                .iter()
                .filter(|(_, value)| value.as_str() == "clicked")
                .filter_map(|(name, _)| name.strip_prefix('c')?.parse::<i64>().ok())
                .collect();
            ListAction::Save { completed }
        } else if pressed("newItem") {
            ListAction::AddItem {
                text: fields.get("new").cloned().unwrap_or_default(),
            }
        } else {
            ListAction::Nothing
        };

        Self {
            action,
            csrf_token: fields.get("csrf_token").cloned().unwrap_or_default(),
        }
    }
}

/// New item text must be longer than two characters
pub fn item_text_is_valid(text: &str) -> bool {
    text.chars().count() > 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_save_collects_clicked_boxes() {
        let submission = ListSubmission::from_fields(&fields(&[
            ("save", "save"),
            ("c3", "clicked"),
            ("c7", "clicked"),
            ("c9", "off"),
            ("csrf_token", "tok"),
        ]));

        assert_eq!(
            submission.action,
            ListAction::Save {
                completed: HashSet::from([3, 7])
            }
        );
        assert_eq!(submission.csrf_token, "tok");
    }

    #[test]
    fn test_save_ignores_malformed_checkbox_names() {
        let submission = ListSubmission::from_fields(&fields(&[
            ("save", "save"),
            ("cx", "clicked"),
            ("new", "clicked"),
        ]));

        assert_eq!(
            submission.action,
            ListAction::Save {
                completed: HashSet::new()
            }
        );
    }

    #[test]
    fn test_save_takes_precedence_over_new_item() {
        let submission = ListSubmission::from_fields(&fields(&[
            ("save", "save"),
            ("newItem", "newItem"),
            ("new", "eggs"),
        ]));

        assert!(matches!(submission.action, ListAction::Save { .. }));
    }

    #[test]
    fn test_new_item() {
        let submission = ListSubmission::from_fields(&fields(&[("newItem", "newItem"), ("new", "eggs")]));
        assert_eq!(
            submission.action,
            ListAction::AddItem {
                text: "eggs".to_string()
            }
        );

        let missing_text = ListSubmission::from_fields(&fields(&[("newItem", "newItem")]));
        assert_eq!(
            missing_text.action,
            ListAction::AddItem {
                text: String::new()
            }
        );
    }

    #[test]
    fn test_empty_buttons_mean_nothing() {
        let submission = ListSubmission::from_fields(&fields(&[("save", ""), ("new", "eggs")]));
        assert_eq!(submission.action, ListAction::Nothing);
    }

    #[test]
    fn test_item_text_length_counts_characters() {
        assert!(!item_text_is_valid(""));
        assert!(!item_text_is_valid("ab"));
        assert!(item_text_is_valid("egg"));
        assert!(!item_text_is_valid("éé"));
        assert!(item_text_is_valid("äöü"));
    }

    #[test]
    fn test_field_errors_require_replaces_length_message() {
        let form = CreateListForm::default();
        let mut errors = FieldErrors::from_validation(form.validate());
        assert!(!errors.get("name").is_empty());

        errors.require("name", &form.name);
        assert_eq!(errors.get("name"), [REQUIRED.to_string()]);
    }

    #[test]
    fn test_register_length_rules() {
        let short = RegisterForm {
            username: "al".to_string(),
            ..Default::default()
        };
        let errors = FieldErrors::from_validation(short.validate());
        assert_eq!(
            errors.get("username"),
            ["Field must be between 3 and 20 characters long.".to_string()]
        );

        let long = RegisterForm {
            username: "a".repeat(21),
            ..Default::default()
        };
        assert!(long.validate().is_err());

        let ok = RegisterForm {
            username: "alice".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }
}
