use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use chrono::{SecondsFormat, SubsecRound, Utc};

/// RFC-3339 timestamp.
///
/// Millisecond precision, matching the store. Output is always UTC with a
/// `Z` suffix and sub-second digits only when they are non-zero. Input
/// accepts any offset and normalizes to UTC; finer digits are left for the
/// parse policy to reject or truncate.
///
/// A string that does not parse is kept as [`DateTime::Malformed`] rather
/// than rejected here: whether it fails the operation or is dropped depends
/// on the configured parse policy, which resolvers apply through
/// [`crate::gql::input`]. A non-string value is always a type error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTime {
    Instant(chrono::DateTime<Utc>),
    Malformed(String),
}

impl DateTime {
    pub fn now() -> Self {
        DateTime::Instant(Utc::now().trunc_subsecs(3))
    }
}

#[Scalar(name = "DateTime")]
impl ScalarType for DateTime {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(raw) => Ok(match chrono::DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(at) => DateTime::Instant(at.with_timezone(&Utc)),
                Err(_) => DateTime::Malformed(raw),
            }),
            other => Err(InputValueError::expected_type(other)),
        }
    }

    fn is_valid(value: &Value) -> bool {
        matches!(value, Value::String(_))
    }

    fn to_value(&self) -> Value {
        match self {
            DateTime::Instant(at) => {
                Value::String(at.trunc_subsecs(3).to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            DateTime::Malformed(raw) => Value::String(raw.clone()),
        }
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(at: chrono::DateTime<Utc>) -> Self {
        DateTime::Instant(at)
    }
}

impl From<bson::DateTime> for DateTime {
    fn from(at: bson::DateTime) -> Self {
        DateTime::Instant(at.to_chrono())
    }
}
