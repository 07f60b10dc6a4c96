//! Domain enumerations for participant attributes.
//!
//! Stored as plain text columns; these types define the closed value sets
//! accepted on update. Parsing is case-insensitive, storage is lowercase.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {field} '{value}', expected one of: {expected}")]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

macro_rules! text_enum {
    ($(#[$doc:meta])* $name:ident, $field:literal, $expected:literal,
     { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(InvalidEnumValue {
                        field: $field,
                        value: s.to_string(),
                        expected: $expected,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(
    /// Functional role of a participant within the program.
    Role,
    "role",
    "engineering, product, design, data, operations",
    {
        Engineering => "engineering",
        Product => "product",
        Design => "design",
        Data => "data",
        Operations => "operations",
    }
);

text_enum!(
    /// Cohort team assignment.
    Team,
    "team",
    "crimson, cobalt, emerald, amber",
    {
        Crimson => "crimson",
        Cobalt => "cobalt",
        Emerald => "emerald",
        Amber => "amber",
    }
);

text_enum!(
    /// Learning track the participant follows.
    Stream,
    "stream",
    "builder, leader",
    {
        Builder => "builder",
        Leader => "leader",
    }
);

text_enum!(
    /// Review lifecycle state stored on a participant record.
    ParticipantStatus,
    "status",
    "pending, approved, rejected",
    {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values_case_insensitively() {
        assert_eq!("engineering".parse::<Role>().unwrap(), Role::Engineering);
        assert_eq!("Crimson".parse::<Team>().unwrap(), Team::Crimson);
        assert_eq!("LEADER".parse::<Stream>().unwrap(), Stream::Leader);
        assert_eq!(
            "approved".parse::<ParticipantStatus>().unwrap(),
            ParticipantStatus::Approved
        );
    }

    #[test]
    fn rejects_unknown_values_with_expected_list() {
        let err = "wizard".parse::<Role>().unwrap_err();
        assert_eq!(err.field, "role");
        assert!(err.expected.contains("engineering"));
        assert!(err.expected.contains("operations"));
    }

    #[test]
    fn display_matches_storage_form() {
        assert_eq!(Team::Emerald.to_string(), "emerald");
        assert_eq!(ParticipantStatus::Pending.as_str(), "pending");
    }
}
