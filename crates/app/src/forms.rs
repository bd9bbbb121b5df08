//! Form validation results.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// A validation message attached to one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as shown on the form
    pub field: &'static str,

    /// User-visible message
    pub message: &'static str,
}

/// Every validation message produced for a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    /// Start with no errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    /// Message recorded for the given field, if any.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    /// Whether the form passed validation.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the recorded messages.
    pub fn entries(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collected errors when at least one was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }

            write!(f, "{}: {}", error.field, error.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for FormErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_field() {
        let mut errors = FormErrors::new();

        errors.push("phone", "Phone number is required");
        errors.push("email", "Email is invalid");

        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.get("notes"), None);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = FormErrors::new();

        errors.push("name", "Product name is required");
        errors.push("price", "Price is required");

        assert_eq!(
            errors.to_string(),
            "name: Product name is required; price: Price is required"
        );
    }

    #[test]
    fn empty_errors_pass_the_value_through() {
        assert_eq!(FormErrors::new().into_result(7), Ok(7));
    }
}
