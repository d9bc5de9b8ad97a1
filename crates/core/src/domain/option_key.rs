use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Short token naming an answer choice within a question, e.g. `"A"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionKey(String);

impl OptionKey {
    pub const MAX_LEN: usize = 10;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let len = value.chars().count();
        if len == 0 || len > Self::MAX_LEN {
            return Err(DomainError::InvalidOptionKey(value));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OptionKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OptionKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OptionKey> for String {
    fn from(value: OptionKey) -> Self {
        value.into_inner()
    }
}

impl AsRef<str> for OptionKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
