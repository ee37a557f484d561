//! Canonical column types.
//!
//! Every vendor-reported type string is normalized into this closed,
//! dialect-independent vocabulary before anything is compared. Expected and
//! live schemas never meet as raw strings.

use std::fmt;

/// Dialect-independent column type.
///
/// Must stay a strict superset of every dialect profile's mapped
/// vocabulary; adding a vendor spelling to a profile may mean adding a
/// member here first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalType {
    Integer,
    Boolean,
    Date,
    DateTime,
    LongText,
    SmallInt,
    Double,
    /// Fixed-width string; always paired with a length.
    FixedString,
    Numeric,
    Text,
    TimestampTz,
}

impl CanonicalType {
    /// Human-readable name for reports and error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::LongText => "longtext",
            Self::SmallInt => "smallint",
            Self::Double => "double precision",
            Self::FixedString => "varchar",
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::TimestampTz => "timestamp with time zone",
        }
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A normalized column type: canonical base plus the width for
/// fixed-width strings.
///
/// Invariant: `length` is `Some` iff `base` is [`CanonicalType::FixedString`].
/// The constructors uphold this; there is no other way to build one outside
/// the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub base: CanonicalType,
    pub length: Option<u32>,
}

impl ColumnType {
    /// An unparametrized type.
    pub fn plain(base: CanonicalType) -> Self {
        debug_assert!(base != CanonicalType::FixedString);
        Self { base, length: None }
    }

    /// A fixed-width string of the given length.
    pub fn fixed(length: u32) -> Self {
        Self {
            base: CanonicalType::FixedString,
            length: Some(length),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length {
            Some(len) => write!(f, "{}({})", self.base, len),
            None => write!(f, "{}", self.base),
        }
    }
}
