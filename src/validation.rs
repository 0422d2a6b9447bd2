//! Field-keyed validation of submitted forms.
//!
//! Forms are deserialized with every field optional so that a missing field
//! becomes a validation error for that field rather than a rejected request.
//! Validators check every field before reporting, so the user sees all of the
//! problems with a submission at once.

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Error messages keyed by the name of the form field they apply to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    /// Record `message` against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Returns `true` if no field has an error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The messages recorded against `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// The first message recorded against `field`, if any.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// The names of the fields that have errors, in alphabetical order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .0
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>();

        write!(f, "{}", messages.join(" "))
    }
}

/// The message for a required field that is missing or blank.
pub fn required_message(field_label: &str) -> String {
    format!("The {field_label} field is required.")
}

/// Trim `value` and return it if anything is left, otherwise record a required
/// field error against `field`.
pub fn required_text(
    value: Option<&str>,
    field: &'static str,
    field_label: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_owned()),
        _ => {
            errors.add(field, required_message(field_label));
            None
        }
    }
}

/// A validated, non-empty name for an account or a category.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityName(String);

impl EntityName {
    /// Create a name, trimming surrounding whitespace.
    ///
    /// Returns `None` if nothing is left after trimming.
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();

        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_owned()))
        }
    }

    /// Create a name without validation.
    ///
    /// The caller should ensure that the string is not empty, e.g. because it
    /// was read back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Form data for creating and editing accounts and categories.
///
/// Unknown fields, such as an owner submitted by the client, are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameForm {
    pub name: Option<String>,
}

/// Check that the form has a non-blank name.
///
/// # Errors
/// Returns [Error::Validation] with an error keyed to `name` if it is missing or blank.
pub fn validate_name_form(form: &NameForm) -> Result<EntityName, Error> {
    let mut errors = ValidationErrors::default();
    let name = required_text(form.name.as_deref(), "name", "name", &mut errors);

    match name.as_deref().and_then(EntityName::new) {
        Some(name) => Ok(name),
        None => Err(Error::Validation(errors)),
    }
}


#[cfg(test)]
mod entity_name_tests {
    use crate::validation::EntityName;

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(EntityName::new(""), None);
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(EntityName::new("\n\t \r"), None);
    }

    #[test]
    fn new_trims_whitespace() {
        let name = EntityName::new("  Wallet ").unwrap();

        assert_eq!(name.as_ref(), "Wallet");
    }
}
