//! Flat, type-tagged records as reported by the storage inventory.

use std::collections::BTreeMap;

use raidtree_api::{
    constants::FIELD_OBJ_TYPE,
    error::{InvalidRecordError, RaidTreeError, ReportError},
};

pub mod decode;
pub mod xml;

pub use decode::{decode, Value};
pub use xml::parse_document;

/// A field exactly as it appeared in the inventory document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawField {
    /// Declared primitive type, e.g. `u32`, `u64` or `astring`.
    pub declared: String,
    pub text: String,
}

/// One inventory object: a set of named, type-tagged fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, RawField>,
}

impl Record {
    pub fn insert(&mut self, name: impl Into<String>, field: RawField) {
        self.fields.insert(name.into(), field);
    }

    pub fn with_field(
        mut self,
        name: impl Into<String>,
        declared: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.insert(
            name,
            RawField {
                declared: declared.into(),
                text: text.into(),
            },
        );
        self
    }

    pub fn raw(&self, name: &str) -> Option<&RawField> {
        self.fields.get(name)
    }

    /// Fields in name order.
    #[cfg(test)]
    pub(crate) fn fields(&self) -> impl Iterator<Item = (&str, &RawField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the numeric object type tag of the record.
    pub fn object_type(&self) -> Result<u64, RaidTreeError> {
        self.require_u64(FIELD_OBJ_TYPE)
    }

    /// Fails unless the record is tagged with the `expected` object type.
    pub fn expect_object_type(&self, expected: u64) -> Result<(), RaidTreeError> {
        let found = self.object_type()?;
        if found != expected {
            return Err(RaidTreeError::new(InvalidRecordError::WrongObjectType {
                expected,
                found,
            }));
        }
        Ok(())
    }

    pub fn optional_u64(&self, name: &str) -> Result<Option<u64>, RaidTreeError> {
        match decode(self, name)? {
            None => Ok(None),
            Some(value) => value
                .as_integer()
                .structured(InvalidRecordError::UnexpectedFieldType {
                    field: name.into(),
                    expected: "numeric",
                })
                .map(Some),
        }
    }

    pub fn require_u64(&self, name: &str) -> Result<u64, RaidTreeError> {
        self.optional_u64(name)?
            .structured(InvalidRecordError::MissingField { field: name.into() })
    }

    pub fn optional_u32(&self, name: &str) -> Result<Option<u32>, RaidTreeError> {
        self.optional_u64(name)?
            .map(|value| {
                u32::try_from(value).structured(InvalidRecordError::OutOfRange {
                    field: name.into(),
                    value,
                })
            })
            .transpose()
    }

    pub fn require_u32(&self, name: &str) -> Result<u32, RaidTreeError> {
        self.optional_u32(name)?
            .structured(InvalidRecordError::MissingField { field: name.into() })
    }

    pub fn optional_text(&self, name: &str) -> Result<Option<String>, RaidTreeError> {
        match decode(self, name)? {
            None => Ok(None),
            Some(value) => value
                .into_text()
                .structured(InvalidRecordError::UnexpectedFieldType {
                    field: name.into(),
                    expected: "text",
                })
                .map(Some),
        }
    }

    /// Text field that defaults to an empty string when absent.
    pub fn text_or_default(&self, name: &str) -> Result<String, RaidTreeError> {
        Ok(self.optional_text(name)?.unwrap_or_default())
    }
}
