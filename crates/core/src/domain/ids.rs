use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::DomainError;

// Ids are UUID v7: their text form sorts by creation time, which gives
// listings their order without a separate position column.
macro_rules! define_id_type {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Uuid);

        impl $name {
            /// Table the id belongs to, used in lookup errors.
            pub const ENTITY: &'static str = $entity;

            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::try_parse(s)
                    .map(Self)
                    .map_err(|_| DomainError::InvalidId {
                        entity: $entity,
                        value: s.to_string(),
                    })
            }
        }
    };
}

define_id_type!(QuizId, "quiz");
define_id_type!(QuestionId, "question");
define_id_type!(OptionId, "option");
