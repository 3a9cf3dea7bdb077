//! Roster membership types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// VATSIM controller rating, by its short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    /// Observer. Exempt from activity requirements.
    Obs,
    S1,
    S2,
    S3,
    C1,
    C2,
    C3,
    I1,
    I3,
    Sup,
    Adm,
}

impl Rating {
    /// Whether this rating is exempt from the facility activity requirement.
    #[must_use]
    pub const fn is_observer(self) -> bool {
        matches!(self, Self::Obs)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Obs => "OBS",
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S3 => "S3",
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::C3 => "C3",
            Self::I1 => "I1",
            Self::I3 => "I3",
            Self::Sup => "SUP",
            Self::Adm => "ADM",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a rating short name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rating: {0}")]
pub struct UnknownRating(pub String);

impl std::str::FromStr for Rating {
    type Err = UnknownRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OBS" => Ok(Self::Obs),
            "S1" => Ok(Self::S1),
            "S2" => Ok(Self::S2),
            "S3" => Ok(Self::S3),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            "C3" => Ok(Self::C3),
            "I1" => Ok(Self::I1),
            "I3" => Ok(Self::I3),
            "SUP" => Ok(Self::Sup),
            "ADM" => Ok(Self::Adm),
            _ => Err(UnknownRating(s.to_string())),
        }
    }
}

/// A controller's relationship with the facility roster.
///
/// Home and visiting controllers are removed through different API
/// endpoints; anything else is surfaced as an unsupported membership
/// instead of being silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Membership {
    Home,
    Visitor,
    Other(String),
}

impl Membership {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Home => "home",
            Self::Visitor => "visitor",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Membership {
    fn from(value: String) -> Self {
        match value.as_str() {
            "home" => Self::Home,
            "visitor" => Self::Visitor,
            _ => Self::Other(value),
        }
    }
}

impl From<Membership> for String {
    fn from(membership: Membership) -> Self {
        membership.as_str().to_string()
    }
}

impl std::fmt::Display for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One controller on the facility roster, as fetched at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub cid: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rating: Rating,
    pub membership: Membership,
}

impl RosterEntry {
    /// "First Last", as used in logs and notices.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
