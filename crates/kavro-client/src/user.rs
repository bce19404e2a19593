//! The `User` record.
//!
//! `User` carries a confidential `address` that must never reach the wire.
//! Serialization goes through [`UserRecord`], which only has the three
//! schema fields, so there is no code path that can encode the address.

use std::fmt;

use apache_avro::types::Value;
use apache_avro::Schema;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A user as entered on the producer side.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub favorite_number: i64,
    pub favorite_color: String,
    address: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        favorite_number: i64,
        favorite_color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            favorite_number,
            favorite_color: favorite_color.into(),
            address: address.into(),
        }
    }

    /// Confidential; empty for users decoded from the topic.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Convert a value decoded from the registry into a `User`.
    ///
    /// The value is first resolved against `reader` so that records written
    /// with a compatible writer schema still decode. `Value::Null` (no
    /// payload) yields `Ok(None)`.
    pub fn from_avro(value: Value, reader: &Schema) -> Result<Option<User>> {
        if matches!(value, Value::Null) {
            return Ok(None);
        }
        let resolved = value.resolve(reader)?;
        let record: UserRecord = apache_avro::from_value(&resolved)?;
        Ok(Some(User::from(record)))
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("favorite_number", &self.favorite_number)
            .field("favorite_color", &self.favorite_color)
            .field("address", &"<redacted>")
            .finish()
    }
}

/// Wire representation of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub favorite_number: i64,
    pub favorite_color: String,
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            favorite_number: user.favorite_number,
            favorite_color: user.favorite_color.clone(),
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User::new(
            record.name,
            String::new(),
            record.favorite_number,
            record.favorite_color,
        )
    }
}
