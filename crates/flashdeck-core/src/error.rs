// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
        }
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport {
            message: format!("I/O error: {value:#?}"),
        }
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport {
            message: format!("JSON error: {value:#?}"),
        }
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport {
            message: format!("TOML error: {value}"),
        }
    }
}

impl From<ValidationError> for ErrorReport {
    fn from(value: ValidationError) -> Self {
        ErrorReport {
            message: format!("Invalid cards: {value}"),
        }
    }
}

impl From<PersistenceError> for ErrorReport {
    fn from(value: PersistenceError) -> Self {
        ErrorReport {
            message: format!("Storage error: {value}"),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {
    fn description(&self) -> &str {
        &self.message
    }
}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: msg.into(),
    })
}

/// Rejection of a bulk import or a replace/append batch. Nothing from the
/// batch is applied when this is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The input was not a sequence of cards.
    NotASequence,
    /// The element at `index` was not an object.
    NotAnObject { index: usize },
    /// A field of the card at `index` violates `constraint`.
    InvalidField {
        index: usize,
        field: &'static str,
        constraint: String,
    },
}

impl ValidationError {
    pub fn invalid_field(index: usize, field: &'static str, constraint: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            index,
            field,
            constraint: constraint.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NotASequence => write!(f, "expected a list of cards"),
            ValidationError::NotAnObject { index } => {
                write!(f, "card {}: expected an object", index + 1)
            }
            ValidationError::InvalidField {
                index,
                field,
                constraint,
            } => write!(f, "card {}: field `{field}` {constraint}", index + 1),
        }
    }
}

impl Error for ValidationError {}

/// A failure reported by a card store. The in-memory collection stays
/// authoritative when one of these occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceError {
    pub message: String,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        PersistenceError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        PersistenceError::new(format!("malformed card data: {value}"))
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for PersistenceError {}
