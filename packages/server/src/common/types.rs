//! Shared domain-neutral types.

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Three-valued truth for judgements that can be genuinely undecided
/// (address validity, commercial classification).
///
/// Serializes as `true` / `false` / `null` so API consumers see the
/// familiar nullable-boolean shape, while the core never conflates
/// "unknown" with "false".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    Confirmed,
    Denied,
    #[default]
    Unknown,
}

impl TriState {
    pub fn is_confirmed(self) -> bool {
        self == TriState::Confirmed
    }

    pub fn is_unknown(self) -> bool {
        self == TriState::Unknown
    }

    /// Collapse to an optional boolean (the wire representation).
    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::Confirmed => Some(true),
            TriState::Denied => Some(false),
            TriState::Unknown => None,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::Confirmed
        } else {
            TriState::Denied
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(v) => v.into(),
            None => TriState::Unknown,
        }
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_option() {
            Some(v) => serializer.serialize_bool(v),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Null => Ok(TriState::Unknown),
            serde_json::Value::Bool(v) => Ok(v.into()),
            other => Err(D::Error::custom(format!(
                "expected bool or null for tri-state, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_nullable_bool() {
        assert_eq!(serde_json::to_value(TriState::Confirmed).unwrap(), true);
        assert_eq!(serde_json::to_value(TriState::Denied).unwrap(), false);
        assert_eq!(
            serde_json::to_value(TriState::Unknown).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn deserializes_null_as_unknown() {
        let state: TriState = serde_json::from_str("null").unwrap();
        assert_eq!(state, TriState::Unknown);
        let state: TriState = serde_json::from_str("true").unwrap();
        assert_eq!(state, TriState::Confirmed);
    }

    #[test]
    fn unknown_is_not_denied() {
        assert_ne!(TriState::Unknown, TriState::Denied);
        assert_eq!(TriState::Unknown.as_option(), None);
    }
}
