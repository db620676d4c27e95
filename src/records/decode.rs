use raidtree_api::{
    constants::MASK_FIELD_SUFFIX,
    error::{InvalidRecordError, RaidTreeError},
};

use super::{RawField, Record};

/// A field value interpreted according to its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned numeric field. Fields whose name ends in `Mask` are read as a
    /// base-2 literal.
    Integer(u64),
    /// String field, passed through without unescaping.
    Text(String),
    /// Field of any other declared type, kept as it was found.
    Raw(String),
}

impl Value {
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(s) | Value::Raw(s) => Some(s),
            Value::Integer(_) => None,
        }
    }
}

/// Decodes the field `name` of `record`. Returns `Ok(None)` when the record
/// does not carry the field.
pub fn decode(record: &Record, name: &str) -> Result<Option<Value>, RaidTreeError> {
    record
        .raw(name)
        .map(|field| decode_field(name, field))
        .transpose()
}

fn decode_field(name: &str, field: &RawField) -> Result<Value, RaidTreeError> {
    let radix = if name.ends_with(MASK_FIELD_SUFFIX) {
        2
    } else {
        10
    };

    let parsed = match field.declared.as_str() {
        "u32" => u32::from_str_radix(field.text.trim(), radix).map(u64::from),
        "u64" => u64::from_str_radix(field.text.trim(), radix),
        "astring" | "ustring" => return Ok(Value::Text(field.text.clone())),
        _ => return Ok(Value::Raw(field.text.clone())),
    };

    parsed.map(Value::Integer).map_err(|_| {
        RaidTreeError::new(InvalidRecordError::ParseNumber {
            field: name.into(),
            declared: field.declared.clone(),
            text: field.text.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use raidtree_api::error::ErrorKind;

    fn record() -> Record {
        Record::default()
            .with_field("ObjType", "u32", "772")
            .with_field("Length", "u64", " 4000000000000 ")
            .with_field("AttributesMask", "u64", "110000000")
            .with_field("ControllerMask", "u32", "0101")
            .with_field("Name", "astring", "Physical Disk 0:1:4")
            .with_field("Nexus", "ustring", r"\0\1\4")
            .with_field("Present", "bool", "true")
            .with_field("Bad", "u32", "12a")
            .with_field("TooBig", "u32", "4294967296")
            .with_field("BadMask", "u64", "1021")
    }

    #[test]
    fn test_decode_numbers() {
        let record = record();
        assert_eq!(decode(&record, "ObjType").unwrap(), Some(Value::Integer(772)));
        assert_eq!(
            decode(&record, "Length").unwrap(),
            Some(Value::Integer(4_000_000_000_000))
        );
    }

    #[test]
    fn test_decode_masks() {
        let record = record();
        assert_eq!(
            decode(&record, "AttributesMask").unwrap(),
            Some(Value::Integer(0b1_1000_0000))
        );
        assert_eq!(
            decode(&record, "ControllerMask").unwrap(),
            Some(Value::Integer(5))
        );
    }

    #[test]
    fn test_decode_text() {
        let record = record();
        assert_eq!(
            decode(&record, "Name").unwrap(),
            Some(Value::Text("Physical Disk 0:1:4".into()))
        );
        // Backslashes are kept as they were reported
        assert_eq!(
            decode(&record, "Nexus").unwrap(),
            Some(Value::Text(r"\0\1\4".into()))
        );
        assert_eq!(
            decode(&record, "Present").unwrap(),
            Some(Value::Raw("true".into()))
        );
    }

    #[test]
    fn test_decode_missing() {
        assert_eq!(decode(&record(), "SpanNum").unwrap(), None);
    }

    #[test]
    fn test_decode_invalid_numbers() {
        let record = record();
        for name in ["Bad", "TooBig", "BadMask"] {
            let error = decode(&record, name).unwrap_err();
            assert!(
                matches!(
                    error.kind(),
                    ErrorKind::InvalidRecord(InvalidRecordError::ParseNumber { field, .. })
                        if field == name
                ),
                "unexpected error for {name}: {error:?}"
            );
        }
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(3).as_integer(), Some(3));
        assert_eq!(Value::Text("x".into()).as_integer(), None);
        assert_eq!(Value::Raw("y".into()).into_text().as_deref(), Some("y"));
        assert_eq!(Value::Integer(3).into_text(), None);
    }
}
