//! Validated value types shared by domain entities.
//!
//! # Responsibility
//! - Normalize and validate raw user/persisted text into typed values.
//! - Keep one validation path for constructors and deserialization.
//!
//! # Invariants
//! - A constructed value always satisfies its format rule.
//! - Deserialization goes through the same `parse` as constructors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_ASSIGNMENT_NAME_CHARS: usize = 60;

static STUDENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][0-9]{4,7}[A-Z]?$").expect("valid student id regex"));
static TUTORIAL_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][0-9]{2}$").expect("valid tutorial class regex"));
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Alphabetic}\p{N}]+( [\p{Alphabetic}\p{N}]+)*$").expect("valid name regex")
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,15}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    )
    .expect("valid email regex")
});

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidStudentId(String),
    InvalidTutorialClass(String),
    InvalidName(String),
    InvalidPhone(String),
    InvalidEmail(String),
    EmptyAssignmentName,
    AssignmentNameTooLong(usize),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStudentId(value) => write!(
                f,
                "invalid student id `{value}`: expected a letter, 4-7 digits and an optional letter"
            ),
            Self::InvalidTutorialClass(value) => write!(
                f,
                "invalid tutorial class `{value}`: expected a letter followed by 2 digits"
            ),
            Self::InvalidName(value) => write!(
                f,
                "invalid name `{value}`: only letters, digits and spaces are allowed"
            ),
            Self::InvalidPhone(value) => {
                write!(f, "invalid phone `{value}`: expected 3 to 15 digits")
            }
            Self::InvalidEmail(value) => {
                write!(f, "invalid email `{value}`: expected local-part@domain")
            }
            Self::EmptyAssignmentName => write!(f, "assignment name cannot be empty"),
            Self::AssignmentNameTooLong(len) => write!(
                f,
                "assignment name has {len} characters; at most {MAX_ASSIGNMENT_NAME_CHARS} allowed"
            ),
        }
    }
}

impl Error for ValidationError {}

macro_rules! text_value {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

/// Matriculation-style student identifier, e.g. `A0001` or `A0123456X`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if !STUDENT_ID_RE.is_match(&normalized) {
            return Err(ValidationError::InvalidStudentId(raw.trim().to_string()));
        }
        Ok(Self(normalized))
    }
}

text_value!(StudentId);

/// Tutorial class code, e.g. `T01`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TutorialClass(String);

impl TutorialClass {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if !TUTORIAL_CLASS_RE.is_match(&normalized) {
            return Err(ValidationError::InvalidTutorialClass(raw.trim().to_string()));
        }
        Ok(Self(normalized))
    }
}

text_value!(TutorialClass);

/// Student display name with collapsed inner whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = collapse_whitespace(raw);
        if !NAME_RE.is_match(&normalized) {
            return Err(ValidationError::InvalidName(raw.trim().to_string()));
        }
        Ok(Self(normalized))
    }

    /// Whole-word, case-insensitive keyword match.
    pub fn contains_word(&self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        !keyword.is_empty()
            && self
                .0
                .split(' ')
                .any(|word| word.to_lowercase() == keyword.to_lowercase())
    }
}

text_value!(Name);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if !PHONE_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidPhone(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

text_value!(Phone);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidEmail(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

text_value!(Email);

/// Free-form note attached to a student. Empty is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Remark(String);

impl Remark {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Ok(Self(raw.trim().to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

text_value!(Remark);

/// Assignment identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssignmentName(String);

impl AssignmentName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = collapse_whitespace(raw);
        if normalized.is_empty() {
            return Err(ValidationError::EmptyAssignmentName);
        }
        let len = normalized.chars().count();
        if len > MAX_ASSIGNMENT_NAME_CHARS {
            return Err(ValidationError::AssignmentNameTooLong(len));
        }
        Ok(Self(normalized))
    }
}

text_value!(AssignmentName);

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
