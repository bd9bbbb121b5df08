//! Customer names

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

/// Shortest accepted name, in characters.
pub const MIN_NAME_CHARS: usize = 2;

/// Longest accepted name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CustomerNameError {
    #[error("Please enter a valid name")]
    Empty,

    #[error("Name must be at least 2 characters")]
    TooShort,

    #[error("Name must be less than 50 characters")]
    TooLong,
}

/// A trimmed customer name of 2 to 50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerName(String);

impl CustomerName {
    /// Trim and validate a name as typed.
    ///
    /// # Errors
    ///
    /// Returns an error when the input is empty, or the trimmed name is
    /// shorter than [`MIN_NAME_CHARS`] or longer than [`MAX_NAME_CHARS`].
    pub fn parse(input: &str) -> Result<Self, CustomerNameError> {
        if input.is_empty() {
            return Err(CustomerNameError::Empty);
        }

        let trimmed = input.trim();

        match trimmed.chars().count() {
            count if count < MIN_NAME_CHARS => Err(CustomerNameError::TooShort),
            count if count > MAX_NAME_CHARS => Err(CustomerNameError::TooLong),
            _ => Ok(Self(trimmed.to_string())),
        }
    }

    /// The validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CustomerName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CustomerName {
    type Error = CustomerNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn trims_surrounding_whitespace() -> TestResult {
        let name = CustomerName::parse("  Asha Rao ")?;

        assert_eq!(name.as_str(), "Asha Rao");

        Ok(())
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(CustomerName::parse("Al").is_ok());
        assert!(CustomerName::parse(&"a".repeat(50)).is_ok());

        assert_eq!(CustomerName::parse("A"), Err(CustomerNameError::TooShort));
        assert_eq!(
            CustomerName::parse(&"a".repeat(51)),
            Err(CustomerNameError::TooLong)
        );
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(CustomerName::parse(""), Err(CustomerNameError::Empty));
        assert_eq!(CustomerName::parse("    "), Err(CustomerNameError::TooShort));
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(CustomerName::parse("Zoë").is_ok());
        assert!(CustomerName::parse(&"é".repeat(50)).is_ok());
    }

    #[test]
    fn messages() {
        assert_eq!(
            CustomerNameError::TooShort.to_string(),
            "Name must be at least 2 characters"
        );
        assert_eq!(
            CustomerNameError::TooLong.to_string(),
            "Name must be less than 50 characters"
        );
    }
}
