use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The fixed slate. `Abstained` is a recordable choice but never a contender:
/// it counts toward turnout while staying out of valid-vote denominators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Candidate {
    #[serde(rename = "Brittany Angel")]
    BrittanyAngel,
    #[serde(rename = "Nathaniel Greyson")]
    NathanielGreyson,
    #[serde(rename = "Sean Danielson")]
    SeanDanielson,
    Abstained,
}

impl Candidate {
    /// Ballot order: the three active candidates, Abstained appended last.
    pub const BALLOT: [Candidate; 4] = [
        Candidate::BrittanyAngel,
        Candidate::NathanielGreyson,
        Candidate::SeanDanielson,
        Candidate::Abstained,
    ];

    pub const ACTIVE: [Candidate; 3] = [
        Candidate::BrittanyAngel,
        Candidate::NathanielGreyson,
        Candidate::SeanDanielson,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Candidate::BrittanyAngel => "Brittany Angel",
            Candidate::NathanielGreyson => "Nathaniel Greyson",
            Candidate::SeanDanielson => "Sean Danielson",
            Candidate::Abstained => "Abstained",
        }
    }

    pub const fn is_abstention(self) -> bool {
        matches!(self, Candidate::Abstained)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("unknown candidate: {0}")]
pub struct ParseCandidateError(pub String);

impl FromStr for Candidate {
    type Err = ParseCandidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Brittany Angel" => Ok(Candidate::BrittanyAngel),
            "Nathaniel Greyson" => Ok(Candidate::NathanielGreyson),
            "Sean Danielson" => Ok(Candidate::SeanDanielson),
            "Abstained" => Ok(Candidate::Abstained),
            other => Err(ParseCandidateError(other.to_string())),
        }
    }
}

/// Voting departments. Declaration order is alphabetical and doubles as the
/// display/grouping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    BSCO,
    DOC,
    DOJ,
    LSPD,
    SASM,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::BSCO,
        Department::DOC,
        Department::DOJ,
        Department::LSPD,
        Department::SASM,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Department::BSCO => "BSCO",
            Department::DOC => "DOC",
            Department::DOJ => "DOJ",
            Department::LSPD => "LSPD",
            Department::SASM => "SASM",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("unknown department: {0}")]
pub struct ParseDepartmentError(pub String);

impl FromStr for Department {
    type Err = ParseDepartmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BSCO" => Ok(Department::BSCO),
            "DOC" => Ok(Department::DOC),
            "DOJ" => Ok(Department::DOJ),
            "LSPD" => Ok(Department::LSPD),
            "SASM" => Ok(Department::SASM),
            other => Err(ParseDepartmentError(other.to_string())),
        }
    }
}

/// One recorded vote. The id and timestamp are assigned at creation and never
/// change; the remaining fields are editable by an admin.
///
/// The serde aliases absorb the field-name variants older exports of the
/// `votes` table used (`votername`, `voter_name`, `created_at`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Uuid,
    #[serde(alias = "votername", alias = "voter_name")]
    pub voter_name: String,
    pub department: Department,
    pub candidate: Candidate,
    /// Epoch milliseconds, client clock at creation.
    #[serde(rename = "timestamp", alias = "created_at")]
    pub timestamp_ms: i64,
}

/// The admin-editable fields, shared by the insert and update payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteFields {
    #[serde(alias = "votername", alias = "voter_name")]
    pub voter_name: String,
    pub department: Department,
    pub candidate: Candidate,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_votes: usize,
    pub valid_votes: usize,
    pub abstentions: usize,
    pub candidate_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub token: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub offline: bool,
    pub total_votes: usize,
}

// Postgres stores both enums as text; decoding funnels through `FromStr` so a
// row with an unrecognized value fails loudly instead of misattributing it.
#[cfg(feature = "backend")]
mod sql {
    use super::{Candidate, Department};

    macro_rules! text_enum {
        ($ty:ty) => {
            impl sqlx::Type<sqlx::Postgres> for $ty {
                fn type_info() -> sqlx::postgres::PgTypeInfo {
                    <&str as sqlx::Type<sqlx::Postgres>>::type_info()
                }
            }

            impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $ty {
                fn decode(
                    value: sqlx::postgres::PgValueRef<'r>,
                ) -> Result<Self, sqlx::error::BoxDynError> {
                    let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                    text.parse().map_err(Into::into)
                }
            }

            impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $ty {
                fn encode_by_ref(
                    &self,
                    buf: &mut sqlx::postgres::PgArgumentBuffer,
                ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                    <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
                }
            }
        };
    }

    text_enum!(Candidate);
    text_enum!(Department);
}
