//! Typed read-only views over decoded API objects.
//!
//! Each record declares the fields the client knows about as optional values
//! and keeps every other key in a flattened catch-all map, so objects from a
//! newer API version decode without loss. Records expose accessors only;
//! nothing mutates a record after it is decoded.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::SparkError;
use crate::session::Items;

/// Declare a record struct and its accessors.
///
/// Every field is stored as `Option<T>` and renamed to camelCase on the wire
/// unless an explicit `as "wireName"` is given.
macro_rules! spark_record {
    (
        $(#[doc = $doc:literal])*
        $name:ident {
            $(
                $(#[doc = $field_doc:literal])*
                $field:ident: $ty:ty $(as $wire:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                $(#[serde(rename = $wire)])?
                #[serde(default, skip_serializing_if = "Option::is_none")]
                $field: Option<$ty>,
            )*
            #[serde(flatten)]
            extra: serde_json::Map<String, serde_json::Value>,
        }

        impl $name {
            $(
                $(#[doc = $field_doc])*
                #[must_use]
                pub fn $field(&self) -> Option<<$ty as $crate::records::FieldView>::View<'_>> {
                    self.$field.as_ref().map($crate::records::FieldView::view)
                }
            )*
        }

        impl $crate::records::Record for $name {
            fn extra(&self) -> &serde_json::Map<String, serde_json::Value> {
                &self.extra
            }
        }
    };
}

mod definitions;
mod timestamp;

pub use definitions::{
    AccessToken, Membership, Message, Person, Room, Team, TeamMembership, Webhook,
};
pub use timestamp::Timestamp;

/// Borrowed view a record accessor hands out for a stored field.
pub trait FieldView {
    /// Borrowed form of the field.
    type View<'a>
    where
        Self: 'a;

    /// Borrow the stored value.
    fn view(&self) -> Self::View<'_>;
}

impl FieldView for String {
    type View<'a> = &'a str;

    fn view(&self) -> &str {
        self
    }
}

impl<T> FieldView for Vec<T> {
    type View<'a>
        = &'a [T]
    where
        T: 'a;

    fn view(&self) -> &[T] {
        self
    }
}

impl FieldView for bool {
    type View<'a> = Self;

    fn view(&self) -> Self {
        *self
    }
}

impl FieldView for u64 {
    type View<'a> = Self;

    fn view(&self) -> Self {
        *self
    }
}

impl FieldView for Timestamp {
    type View<'a> = &'a Self;

    fn view(&self) -> &Self {
        self
    }
}

/// Behaviour shared by every decoded record.
pub trait Record: DeserializeOwned + serde::Serialize {
    /// Keys the record does not model, exactly as received.
    fn extra(&self) -> &serde_json::Map<String, Value>;

    /// Look up an unmodelled key.
    fn extra_field(&self, key: &str) -> Option<&Value> {
        self.extra().get(key)
    }

    /// Decode a record from one JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::MalformedResponse`] when `value` is not an
    /// object or a known field carries the wrong JSON type.
    fn from_value(value: Value) -> Result<Self, SparkError> {
        decode_record(value)
    }

    /// Re-encode the record, known and unknown fields alike.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::MalformedResponse`] if serialisation fails.
    fn to_value(&self) -> Result<Value, SparkError> {
        serde_json::to_value(self).map_err(|error| {
            SparkError::malformed_response(format!("record cannot be encoded: {error}"))
        })
    }
}

/// Decode one JSON object into a record type.
///
/// # Errors
///
/// Returns [`SparkError::MalformedResponse`] when the value does not match
/// the record's shape.
pub fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, SparkError> {
    if !value.is_object() {
        return Err(SparkError::malformed_response(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value)
        .map_err(|error| SparkError::malformed_response(format!("record: {error}")))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Lazy iterator decoding each collection item into `T`.
///
/// Ends after the first error, whether it came from the session or from
/// decoding.
pub struct RecordIter<'s, T> {
    items: Items<'s>,
    failed: bool,
    marker: PhantomData<fn() -> T>,
}

impl<'s, T> RecordIter<'s, T> {
    /// Wrap a raw item iterator.
    #[must_use]
    pub const fn new(items: Items<'s>) -> Self {
        Self {
            items,
            failed: false,
            marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Iterator for RecordIter<'_, T> {
    type Item = Result<T, SparkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let decoded = self.items.next()?.and_then(decode_record);
        self.failed = decoded.is_err();
        Some(decoded)
    }
}

impl<T: DeserializeOwned> FusedIterator for RecordIter<'_, T> {}
