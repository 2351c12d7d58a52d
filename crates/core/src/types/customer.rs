//! Validated checkout fields.
//!
//! Both types validate the raw input exactly as typed and store it trimmed,
//! which is what gets sent with an order.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CustomerName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerNameError {
    /// The input string is empty or only whitespace.
    #[error("name cannot be empty")]
    Empty,
    /// The input contains something other than letters and whitespace.
    #[error("name may only contain letters and spaces (found {0:?})")]
    InvalidCharacter(char),
}

/// A customer's name: ASCII letters and ASCII whitespace only.
///
/// ## Examples
///
/// ```
/// use lesson_shop_core::CustomerName;
///
/// assert!(CustomerName::parse("John Doe").is_ok());
/// assert!(CustomerName::parse("John123").is_err());
/// assert!(CustomerName::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerName(String);

impl CustomerName {
    /// Parse a `CustomerName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or contains any character that
    /// is neither an ASCII letter nor ASCII whitespace.
    pub fn parse(s: &str) -> Result<Self, CustomerNameError> {
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphabetic() || c.is_ascii_whitespace()))
        {
            return Err(CustomerNameError::InvalidCharacter(bad));
        }

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CustomerNameError::Empty);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CustomerName {
    type Err = CustomerNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CustomerName {
    type Error = CustomerNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerName> for String {
    fn from(name: CustomerName) -> Self {
        name.0
    }
}

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a non-digit.
    #[error("phone number may only contain digits (found {0:?})")]
    InvalidCharacter(char),
}

/// A customer's phone number: ASCII digits only, no separators.
///
/// ## Examples
///
/// ```
/// use lesson_shop_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("5551234").is_ok());
/// assert!(PhoneNumber::parse("555-1234").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains a non-digit.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        if let Some(bad) = s.chars().find(|c| !c.is_ascii_digit()) {
            return Err(PhoneNumberError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
