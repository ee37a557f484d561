//! Database dialects and type normalization.
//!
//! Each supported vendor gets a [`DialectProfile`]: the vocabulary mapping
//! vendor type spellings to [`CanonicalType`] members, plus the
//! `information_schema` queries used to introspect the live schema.
//! The profile is threaded explicitly through the builder and the
//! reconciler, so two dialects can be exercised in one process.

use crate::error::{DriftError, DriftResult};
use crate::types::{CanonicalType, ColumnType};

use nom::IResult;
use nom::bytes::complete::take_till1;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::delimited;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
}

impl Dialect {
    /// Resolve the dialect from a connection URL scheme.
    ///
    /// Anything other than a postgres or mysql URL is a fatal
    /// configuration error, raised before any introspection happens.
    pub fn from_url(url: &str) -> DriftResult<Self> {
        let scheme = url.split("://").next().unwrap_or(url);
        match scheme {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            other => Err(DriftError::UnknownVendor(other.to_string())),
        }
    }

    pub fn profile(self) -> &'static DialectProfile {
        match self {
            Dialect::Postgres => &POSTGRES,
            Dialect::MySql => &MYSQL,
        }
    }
}

/// Per-vendor type vocabulary and introspection queries.
///
/// Registering a new vendor means adding a [`Dialect`] variant and a
/// profile here; the builder and reconciler are untouched.
pub struct DialectProfile {
    pub dialect: Dialect,
    pub name: &'static str,
    /// Vendor substring fragments, matched by containment against raw type
    /// strings. None of these map to `FixedString`; parametrized widths go
    /// through the fallback pattern instead.
    type_map: &'static [(&'static str, CanonicalType)],
    /// Lists the physical table names present in the current schema.
    pub tables_query: &'static str,
    /// Returns `(column_name, raw_type_string)` pairs for one table,
    /// bound with the vendor's placeholder syntax.
    pub columns_query: &'static str,
}

static POSTGRES: DialectProfile = DialectProfile {
    dialect: Dialect::Postgres,
    name: "postgres",
    type_map: &[
        ("timestamp with time zone", CanonicalType::TimestampTz),
        ("timestamptz", CanonicalType::TimestampTz),
        ("timestamp without time zone", CanonicalType::DateTime),
        ("datetime", CanonicalType::DateTime),
        ("double precision", CanonicalType::Double),
        ("smallint", CanonicalType::SmallInt),
        ("integer", CanonicalType::Integer),
        ("serial", CanonicalType::Integer),
        ("boolean", CanonicalType::Boolean),
        ("bool", CanonicalType::Boolean),
        ("numeric", CanonicalType::Numeric),
        ("decimal", CanonicalType::Numeric),
        ("text", CanonicalType::Text),
        ("date", CanonicalType::Date),
    ],
    tables_query: "select table_name from information_schema.tables \
                   where table_schema = 'public' and table_type = 'BASE TABLE'",
    // data_type drops the width, so concatenate character_maximum_length
    // back on; fixed-width columns then normalize the same way as MySQL's
    // column_type.
    columns_query: "select column_name, \
                    case when character_maximum_length is null then data_type \
                         else data_type || '(' || character_maximum_length || ')' end \
                    from information_schema.columns \
                    where table_schema = 'public' and table_name = $1",
};

static MYSQL: DialectProfile = DialectProfile {
    dialect: Dialect::MySql,
    name: "mysql",
    type_map: &[
        ("tinyint(1)", CanonicalType::Boolean),
        ("bool", CanonicalType::Boolean),
        ("longtext", CanonicalType::LongText),
        ("datetime", CanonicalType::DateTime),
        ("double precision", CanonicalType::Double),
        ("double", CanonicalType::Double),
        ("smallint", CanonicalType::SmallInt),
        ("integer", CanonicalType::Integer),
        ("int", CanonicalType::Integer),
        ("numeric", CanonicalType::Numeric),
        ("decimal", CanonicalType::Numeric),
        ("text", CanonicalType::Text),
        ("date", CanonicalType::Date),
    ],
    tables_query: "select table_name from information_schema.tables \
                   where table_schema = database()",
    columns_query: "select column_name, column_type \
                    from information_schema.columns \
                    where table_schema = database() and table_name = ?",
};

impl DialectProfile {
    /// Normalize a raw vendor type string into a canonical column type.
    ///
    /// Two-stage match: the longest map fragment contained in `raw` wins
    /// (ties broken by map position, so the result is deterministic even
    /// with overlapping fragments — `smallint` beats `int`, `datetime`
    /// beats `date`). If no fragment matches, the parametrized pattern
    /// `name(<integer>)` produces a fixed-width string. `None` means the
    /// vocabulary is incomplete; callers must treat that as fatal.
    pub fn normalize(&self, raw: &str) -> Option<ColumnType> {
        let mut best: Option<(&str, CanonicalType)> = None;
        for &(fragment, canonical) in self.type_map {
            if !raw.contains(fragment) {
                continue;
            }
            match best {
                Some((held, _)) if held.len() >= fragment.len() => {}
                _ => best = Some((fragment, canonical)),
            }
        }
        if let Some((_, canonical)) = best {
            return Some(ColumnType::plain(canonical));
        }
        match all_consuming(fixed_width)(raw) {
            Ok((_, length)) => Some(ColumnType::fixed(length)),
            Err(_) => None,
        }
    }

    /// Convert a declared table name to the vendor's naming convention.
    /// Both supported vendors fold identifiers to lowercase.
    pub fn table_name(&self, name: &str) -> String {
        name.to_ascii_lowercase()
    }
}

/// Parse `name(<integer>)`, e.g. `varchar(255)` or `character varying(100)`.
fn fixed_width(input: &str) -> IResult<&str, u32> {
    let (input, _name) = take_till1(|c| c == '(')(input)?;
    let (input, length) = delimited(char('('), map_res(digit1, str::parse), char(')'))(input)?;
    Ok((input, length))
}
