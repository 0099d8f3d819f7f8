//! Decoding of GraphQL input into store-ready values.
//!
//! Every input is decoded once, here, before any store call. Update inputs
//! distinguish three states per field through [`MaybeUndefined`]: absent
//! (leave as is), explicit `null` (clear, where the field allows it) and a
//! value (set).

use async_graphql::{MaybeUndefined, ID};
use bson::oid::ObjectId;
use chrono::{SecondsFormat, Utc};
use infra::Patch;

use crate::config::DateTimeParsePolicy;
use crate::gql::error::GqlError;
use crate::gql::scalars::DateTime;

pub fn parse_object_id(id: &ID) -> Result<ObjectId, GqlError> {
    ObjectId::parse_str(id.as_str()).map_err(|e| GqlError::InvalidId(format!("'{}': {e}", id.as_str())))
}

/// A field that may be left out of an update but never nulled.
pub fn present<T>(field: &str, value: MaybeUndefined<T>) -> Result<Option<T>, GqlError> {
    match value {
        MaybeUndefined::Undefined => Ok(None),
        MaybeUndefined::Null => Err(GqlError::malformed(field, "cannot be null")),
        MaybeUndefined::Value(v) => Ok(Some(v)),
    }
}

/// A field that explicit `null` clears.
pub fn clearable<T>(value: MaybeUndefined<T>) -> Patch<T> {
    match value {
        MaybeUndefined::Undefined => Patch::Keep,
        MaybeUndefined::Null => Patch::Clear,
        MaybeUndefined::Value(v) => Patch::Set(v),
    }
}

pub fn finite(field: &str, value: f64) -> Result<f64, GqlError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GqlError::malformed(field, "must be a finite number"))
    }
}

pub fn latitude(field: &str, value: f64) -> Result<f64, GqlError> {
    let value = finite(field, value)?;
    if (-90.0..=90.0).contains(&value) {
        Ok(value)
    } else {
        Err(GqlError::malformed(field, format!("latitude {value} outside [-90, 90]")))
    }
}

pub fn longitude(field: &str, value: f64) -> Result<f64, GqlError> {
    let value = finite(field, value)?;
    if (-180.0..=180.0).contains(&value) {
        Ok(value)
    } else {
        Err(GqlError::malformed(field, format!("longitude {value} outside [-180, 180]")))
    }
}

impl DateTimeParsePolicy {
    /// Resolves an optional timestamp. Under the lenient policy a malformed
    /// string counts as not supplied.
    pub fn optional(
        self,
        field: &str,
        value: Option<DateTime>,
    ) -> Result<Option<bson::DateTime>, GqlError> {
        match value {
            None => Ok(None),
            Some(DateTime::Instant(at)) => self.to_store(field, at).map(Some),
            Some(DateTime::Malformed(raw)) => match self {
                DateTimeParsePolicy::Strict => Err(not_rfc3339(field, &raw)),
                DateTimeParsePolicy::Lenient => {
                    tracing::warn!(field, value = %raw, "ignoring unparsable date-time");
                    Ok(None)
                }
            },
        }
    }

    /// Resolves a timestamp the operation cannot do without. A value dropped
    /// by the lenient policy still fails here.
    pub fn required(self, field: &str, value: DateTime) -> Result<bson::DateTime, GqlError> {
        match value {
            DateTime::Instant(at) => self.to_store(field, at),
            DateTime::Malformed(raw) => Err(not_rfc3339(field, &raw)),
        }
    }

    /// Converts to the store's millisecond resolution. Strict rejects an
    /// instant that would lose digits; lenient truncates it.
    fn to_store(
        self,
        field: &str,
        at: chrono::DateTime<Utc>,
    ) -> Result<bson::DateTime, GqlError> {
        if at.timestamp_subsec_nanos() % 1_000_000 != 0 {
            match self {
                DateTimeParsePolicy::Strict => {
                    return Err(GqlError::malformed(
                        field,
                        format!(
                            "'{}' is more precise than milliseconds",
                            at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
                        ),
                    ))
                }
                DateTimeParsePolicy::Lenient => {
                    tracing::warn!(field, value = %at, "truncating date-time to milliseconds");
                }
            }
        }
        Ok(bson::DateTime::from_chrono(at))
    }

    /// Resolves a clearable timestamp of an update input.
    pub fn clearable(
        self,
        field: &str,
        value: MaybeUndefined<DateTime>,
    ) -> Result<Patch<bson::DateTime>, GqlError> {
        Ok(match clearable(value) {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(at) => match self.optional(field, Some(at))? {
                Some(at) => Patch::Set(at),
                None => Patch::Keep,
            },
        })
    }

    /// Resolves a non-clearable timestamp of an update input.
    pub fn present(
        self,
        field: &str,
        value: MaybeUndefined<DateTime>,
    ) -> Result<Option<bson::DateTime>, GqlError> {
        self.optional(field, present(field, value)?)
    }
}

fn not_rfc3339(field: &str, raw: &str) -> GqlError {
    GqlError::malformed(field, format!("'{raw}' is not an RFC-3339 date-time"))
}
