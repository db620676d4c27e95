use std::collections::BTreeMap;

use anyhow::{bail, Context, Error};
use log::trace;
use quick_xml::{events::Event, Reader};
use serde::Deserialize;

use raidtree_api::constants::RECORD_ELEMENT;

use super::{RawField, Record};

/// A field element, e.g. `<Name type="astring">PERC H730P</Name>`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldElement {
    #[serde(default, rename = "@type")]
    declared: String,

    #[serde(default, rename = "$text")]
    text: String,
}

/// Parses an inventory document into its records.
///
/// Every `DCStorageObject` element is one record, wherever it appears in the
/// document; each of its child elements is a field named after the element,
/// with the declared primitive type in the `type` attribute. Elements outside
/// of records (status codes, object counts) are ignored.
pub fn parse_document(text: &str) -> Result<Vec<Record>, Error> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    loop {
        let start_position = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .with_context(|| format!("Malformed XML at position {}", reader.buffer_position()))?;

        match event {
            Event::Start(start) if start.local_name().as_ref() == RECORD_ELEMENT.as_bytes() => {
                let end = start.to_end().into_owned();
                reader
                    .read_to_end(end.name())
                    .with_context(|| format!("Unterminated '{RECORD_ELEMENT}' element"))?;
                let element = text
                    .get(start_position..reader.buffer_position() as usize)
                    .context("Record does not end on a character boundary")?;
                records.push(parse_record(element)?);
            }
            Event::Empty(start) if start.local_name().as_ref() == RECORD_ELEMENT.as_bytes() => {
                records.push(Record::default());
            }
            Event::Eof => break,
            _ => (),
        }
    }

    Ok(records)
}

/// Deserializes one complete `DCStorageObject` element.
fn parse_record(element: &str) -> Result<Record, Error> {
    let fields: BTreeMap<String, FieldElement> =
        quick_xml::de::from_str(element).context("Invalid record")?;

    let mut record = Record::default();
    for (name, field) in fields {
        if name == RECORD_ELEMENT {
            bail!("Nested '{RECORD_ELEMENT}' element");
        }
        record.insert(
            name,
            RawField {
                declared: field.declared,
                text: field.text.trim().to_string(),
            },
        );
    }

    trace!("Parsed record with {} fields", record.len());
    Ok(record)
}
