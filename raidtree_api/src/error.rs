use std::fmt::{Debug, Write};
use std::{borrow::Cow, panic::Location};

use strum_macros::IntoStaticStr;

/// A record did not have the shape its consumer requires.
#[derive(Debug, Clone, Eq, thiserror::Error, PartialEq)]
pub enum InvalidRecordError {
    #[error("Expected record of object type {expected}, found object type {found}")]
    WrongObjectType { expected: u64, found: u64 },
    #[error("Record is missing required field '{field}'")]
    MissingField { field: String },
    #[error("Field '{field}' holds '{text}', which is not a valid {declared} value")]
    ParseNumber {
        field: String,
        declared: String,
        text: String,
    },
    #[error("Field '{field}' was expected to be {expected}")]
    UnexpectedFieldType {
        field: String,
        expected: &'static str,
    },
    #[error("Field '{field}' holds {value}, which does not fit in 32 bits")]
    OutOfRange { field: String, value: u64 },
}

/// The records did not describe a consistent topology.
#[derive(Debug, Clone, Eq, thiserror::Error, PartialEq)]
pub enum TopologyError {
    #[error("Controller {controller} was reported more than once")]
    DuplicateController { controller: u32 },
    #[error("Controller {controller} is not registered")]
    UnknownController { controller: u32 },
    #[error("Virtual disk {controller}:{logical_drive} was reported more than once")]
    DuplicateVirtualDisk { controller: u32, logical_drive: u32 },
    #[error("Virtual disk {controller}:{logical_drive} is not registered")]
    UnknownVirtualDisk { controller: u32, logical_drive: u32 },
    #[error("Virtual disk {controller}:{logical_drive} is its own ancestor")]
    CyclicHierarchy { controller: u32, logical_drive: u32 },
    #[error("Virtual disk {controller}:{logical_drive} is a span and cannot own disk assignments")]
    AssignToSpan { controller: u32, logical_drive: u32 },
    #[error("Physical disk {disk} was reported more than once")]
    DuplicatePhysicalDisk { disk: String },
    #[error("Physical disk {disk} is not registered")]
    UnknownPhysicalDisk { disk: String },
}

/// Records could not be obtained from the inventory.
#[derive(Debug, Clone, Eq, thiserror::Error, PartialEq)]
pub enum AcquisitionError {
    #[error("Failed to query {what}")]
    Query { what: String },
    #[error("Failed to read inventory document '{path}'")]
    ReadDocument { path: String },
    #[error("Failed to parse inventory document for {what}")]
    ParseDocument { what: String },
}

#[derive(Debug, Clone, Eq, thiserror::Error, PartialEq)]
pub enum InternalError {
    #[error("Failed to initialize logging")]
    Logging,
    #[error("Failed to write the report")]
    WriteOutput,
}

/// Each variant of `ErrorKind` corresponds to a different category of error.
#[derive(Debug, Clone, Eq, thiserror::Error, IntoStaticStr, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// A record violated the precondition of the operation consuming it.
    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecordError),

    /// A lookup by controller number or composite key found nothing, or the
    /// records contradict each other.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// The inventory could not be queried.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// Logging could not be set up or the output could not be written.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Debug)]
struct RaidTreeErrorInner {
    kind: ErrorKind,
    location: &'static Location<'static>,
    source: Option<anyhow::Error>,
    context: Vec<(Cow<'static, str>, &'static Location<'static>)>,
}

pub struct RaidTreeError(Box<RaidTreeErrorInner>);
impl RaidTreeError {
    #[track_caller]
    pub fn new(kind: impl Into<ErrorKind>) -> Self {
        RaidTreeError(Box::new(RaidTreeErrorInner {
            kind: kind.into(),
            location: Location::caller(),
            source: None,
            context: Vec::new(),
        }))
    }

    /// Returns a reference to the inner ErrorKind.
    pub fn kind(&self) -> &ErrorKind {
        &self.0.kind
    }

    /// Returns the kebab-case name of the error category.
    pub fn category(&self) -> &'static str {
        (&self.0.kind).into()
    }
}

pub trait ReportError<T, K> {
    /// Convert this error into a structured RaidTreeError.
    fn structured(self, kind: K) -> Result<T, RaidTreeError>;
}

impl<T, K> ReportError<T, K> for Option<T>
where
    K: Into<ErrorKind>,
{
    #[track_caller]
    fn structured(self, kind: K) -> Result<T, RaidTreeError> {
        match self {
            Some(t) => Ok(t),
            None => Err(RaidTreeError(Box::new(RaidTreeErrorInner {
                kind: kind.into(),
                location: Location::caller(),
                source: None,
                context: Vec::new(),
            }))),
        }
    }
}

impl<T, E, K> ReportError<T, K> for Result<T, E>
where
    E: Into<anyhow::Error>,
    K: Into<ErrorKind>,
{
    #[track_caller]
    fn structured(self, kind: K) -> Result<T, RaidTreeError> {
        match self {
            Ok(o) => Ok(o),
            Err(e) => Err(RaidTreeError(Box::new(RaidTreeErrorInner {
                kind: kind.into(),
                location: Location::caller(),
                source: Some(e.into()),
                context: Vec::new(),
            }))),
        }
    }
}

pub trait RaidTreeResultExt<T> {
    /// Attach a context message to the error.
    fn message(self, context: impl Into<Cow<'static, str>>) -> Result<T, RaidTreeError>;
}
impl<T> RaidTreeResultExt<T> for Result<T, RaidTreeError> {
    #[track_caller]
    fn message(mut self, context: impl Into<Cow<'static, str>>) -> Result<T, RaidTreeError> {
        if let Err(ref mut e) = self {
            e.0.context.push((context.into(), Location::caller()));
        }
        self
    }
}

impl Debug for RaidTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} at {}:{}",
            self.category(),
            self.0.kind,
            self.0.location.file(),
            self.0.location.line()
        )?;

        if !self.0.context.is_empty() {
            writeln!(f, "\n\nContext:")?;
            for (i, (context, location)) in self.0.context.iter().enumerate() {
                for (j, line) in context.split('\n').enumerate() {
                    if j == 0 {
                        write!(f, "{: >5}: ", i)?;
                    } else {
                        f.write_str("\n       ")?;
                    }
                    f.write_str(line)?;
                }
                writeln!(f, " at {}:{}", location.file(), location.line())?;
            }
        }

        if let Some(ref source) = self.0.source {
            writeln!(f, "\n\nCaused by:")?;
            let mut index = 0;
            let mut source: Option<&dyn std::error::Error> = Some(source.as_ref());
            while let Some(e) = source {
                for (i, line) in e.to_string().split('\n').enumerate() {
                    if i == 0 {
                        write!(f, "{: >5}: ", index)?;
                    } else {
                        f.write_str("\n       ")?;
                    }
                    f.write_str(line)?;
                }
                f.write_char('\n')?;
                source = e.source();
                index += 1;
            }
        }
        Ok(())
    }
}
