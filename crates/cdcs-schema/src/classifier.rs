//! Native column type to logical type classification
//!
//! The input is the type string a describe-table call reports, for example
//! `varchar(255)`, `decimal(10,2)` or `int(11) unsigned`. The qualifier
//! starting at the first `(` is removed and the remaining keyword is looked
//! up in [`TYPE_TABLE`] by exact, case-sensitive match. Keywords that are not
//! in the table become `string`; classification never fails.

use crate::diagnostics::DiagnosticSink;
use crate::types::{FieldDescriptor, LogicalType, NO_LENGTH};
use regex::Regex;
use std::sync::LazyLock;

/// Everything from the first opening parenthesis to the end of the string
static QUALIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\(.*").expect("qualifier pattern is valid"));

/// First parenthesized unsigned integer, e.g. the `255` of `varchar(255)`
static LENGTH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]+)\)").expect("length pattern is valid"));

/// Whether a table entry reads its length from the qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    Extract,
    Ignore,
}

/// Every recognized native type keyword
pub const TYPE_TABLE: &[(&str, LogicalType, LengthRule)] = &[
    ("date", LogicalType::String, LengthRule::Extract),
    ("datetime", LogicalType::String, LengthRule::Extract),
    ("time", LogicalType::String, LengthRule::Extract),
    ("timestamp", LogicalType::String, LengthRule::Extract),
    ("year", LogicalType::String, LengthRule::Extract),
    ("tinytext", LogicalType::String, LengthRule::Extract),
    ("text", LogicalType::String, LengthRule::Extract),
    ("mediumtext", LogicalType::String, LengthRule::Extract),
    ("longtext", LogicalType::String, LengthRule::Extract),
    ("char", LogicalType::String, LengthRule::Extract),
    ("varchar", LogicalType::String, LengthRule::Extract),
    ("enum", LogicalType::String, LengthRule::Ignore),
    ("set", LogicalType::String, LengthRule::Ignore),
    ("tinyblob", LogicalType::Bytes, LengthRule::Ignore),
    ("blob", LogicalType::Bytes, LengthRule::Ignore),
    ("mediumblob", LogicalType::Bytes, LengthRule::Ignore),
    ("longblob", LogicalType::Bytes, LengthRule::Ignore),
    ("binary", LogicalType::Bytes, LengthRule::Ignore),
    ("varbinary", LogicalType::Bytes, LengthRule::Ignore),
    ("int", LogicalType::Int, LengthRule::Ignore),
    ("smallint", LogicalType::Int, LengthRule::Ignore),
    ("mediumint", LogicalType::Int, LengthRule::Ignore),
    ("integer", LogicalType::Int, LengthRule::Ignore),
    ("tinyint", LogicalType::Int, LengthRule::Ignore),
    ("short", LogicalType::Int, LengthRule::Ignore),
    ("bit", LogicalType::Int, LengthRule::Ignore),
    ("float", LogicalType::Float, LengthRule::Ignore),
    ("double", LogicalType::Double, LengthRule::Ignore),
    ("decimal", LogicalType::Double, LengthRule::Ignore),
    ("null", LogicalType::Null, LengthRule::Ignore),
    ("long", LogicalType::Long, LengthRule::Ignore),
    ("bigint", LogicalType::Long, LengthRule::Ignore),
];

/// Result of classifying one native type string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub logical_type: LogicalType,
    /// The input with its qualifier removed
    pub native_type: &'a str,
    pub length: i32,
    /// False when the keyword fell through to the default `string` arm
    pub recognized: bool,
}

/// Remove the parenthesized qualifier and anything after it
pub fn strip_qualifier(raw: &str) -> &str {
    match QUALIFIER_REGEX.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    }
}

/// Read the first `(<digits>)` group of `raw`.
///
/// Returns `None` when there is no such group or the number does not fit.
pub fn extract_length(raw: &str) -> Option<i32> {
    LENGTH_REGEX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Look a stripped keyword up in [`TYPE_TABLE`]
pub fn lookup(native_type: &str) -> Option<(LogicalType, LengthRule)> {
    TYPE_TABLE
        .iter()
        .find(|(keyword, _, _)| *keyword == native_type)
        .map(|(_, logical_type, rule)| (*logical_type, *rule))
}

/// Classify a native type string. Total: every input yields a result.
pub fn classify(raw: &str) -> Classification<'_> {
    let native_type = strip_qualifier(raw);

    match lookup(native_type) {
        Some((logical_type, rule)) => {
            let length = match rule {
                LengthRule::Extract => extract_length(raw).unwrap_or(NO_LENGTH),
                LengthRule::Ignore => NO_LENGTH,
            };
            Classification {
                logical_type,
                native_type,
                length,
                recognized: true,
            }
        }
        None => Classification {
            logical_type: LogicalType::String,
            native_type,
            length: NO_LENGTH,
            recognized: false,
        },
    }
}

/// Build the descriptor of one column, reporting unrecognized types to `sink`
pub fn classify_field(
    name: impl Into<String>,
    raw_type: &str,
    sink: &dyn DiagnosticSink,
) -> FieldDescriptor {
    let classification = classify(raw_type);
    let field = FieldDescriptor {
        name: name.into(),
        logical_type: classification.logical_type,
        native_type: classification.native_type.to_string(),
        length: classification.length,
    };

    if !classification.recognized {
        sink.unrecognized_type(raw_type, &field);
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;

    #[test]
    fn test_every_table_entry() {
        for (keyword, logical_type, _) in TYPE_TABLE {
            let c = classify(keyword);
            assert_eq!(c.logical_type, *logical_type, "keyword {}", keyword);
            assert_eq!(c.native_type, *keyword);
            assert_eq!(c.length, NO_LENGTH, "bare {} has no length", keyword);
            assert!(c.recognized);
        }
    }

    #[test]
    fn test_table_families() {
        let expect = [
            ("date", LogicalType::String),
            ("year", LogicalType::String),
            ("longtext", LogicalType::String),
            ("set", LogicalType::String),
            ("varbinary", LogicalType::Bytes),
            ("mediumblob", LogicalType::Bytes),
            ("bit", LogicalType::Int),
            ("short", LogicalType::Int),
            ("float", LogicalType::Float),
            ("decimal", LogicalType::Double),
            ("null", LogicalType::Null),
            ("long", LogicalType::Long),
            ("bigint", LogicalType::Long),
        ];
        for (keyword, logical_type) in expect {
            assert_eq!(classify(keyword).logical_type, logical_type, "{}", keyword);
        }
    }

    #[test]
    fn test_table_has_no_duplicates() {
        for (i, (a, _, _)) in TYPE_TABLE.iter().enumerate() {
            assert!(
                TYPE_TABLE[i + 1..].iter().all(|(b, _, _)| a != b),
                "{} listed twice",
                a
            );
        }
    }

    #[test]
    fn test_string_length_extraction() {
        let c = classify("varchar(255)");
        assert_eq!(c.logical_type, LogicalType::String);
        assert_eq!(c.native_type, "varchar");
        assert_eq!(c.length, 255);

        assert_eq!(classify("char(1)").length, 1);
        assert_eq!(classify("datetime(6)").length, 6);
    }

    #[test]
    fn test_enum_and_set_never_extract_length() {
        let c = classify("enum('a','b')");
        assert_eq!(c.logical_type, LogicalType::String);
        assert_eq!(c.native_type, "enum");
        assert_eq!(c.length, NO_LENGTH);

        assert_eq!(classify("set('1','2')").length, NO_LENGTH);
        assert_eq!(classify("enum('(3)')").length, NO_LENGTH);
    }

    #[test]
    fn test_non_string_types_never_extract_length() {
        let c = classify("decimal(10,2)");
        assert_eq!(c.logical_type, LogicalType::Double);
        assert_eq!(c.length, NO_LENGTH);

        assert_eq!(classify("int(11)").length, NO_LENGTH);
        assert_eq!(classify("varbinary(16)").length, NO_LENGTH);
        assert_eq!(classify("bigint(20) unsigned").logical_type, LogicalType::Long);
    }

    #[test]
    fn test_string_without_parenthesis_has_no_length() {
        assert_eq!(classify("timestamp").length, NO_LENGTH);
        assert_eq!(classify("text").length, NO_LENGTH);
        assert_eq!(classify("varchar(").length, NO_LENGTH);
        assert_eq!(classify("varchar(abc)").length, NO_LENGTH);
    }

    #[test]
    fn test_overflowing_length_falls_back() {
        assert_eq!(classify("varchar(99999999999)").length, NO_LENGTH);
    }

    #[test]
    fn test_only_ascii_digits_are_a_length() {
        assert_eq!(extract_length("varchar(١٢)"), None);
        assert_eq!(extract_length("varchar(١٢)(8)"), Some(8));
        assert_eq!(classify("varchar(١٢)").length, NO_LENGTH);
    }

    #[test]
    fn test_unknown_type_falls_back_to_string() {
        let c = classify("geometry");
        assert_eq!(c.logical_type, LogicalType::String);
        assert_eq!(c.native_type, "geometry");
        assert_eq!(c.length, NO_LENGTH);
        assert!(!c.recognized);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let c = classify("VARCHAR(10)");
        assert!(!c.recognized);
        assert_eq!(c.native_type, "VARCHAR");
        assert_eq!(c.length, NO_LENGTH);
    }

    #[test]
    fn test_totality_on_odd_inputs() {
        for raw in ["", "(", ")", ")(", "((1))", "int((", "varchar(1)(2)", " ", "\n(x"] {
            let c = classify(raw);
            assert!(LogicalType::ALL.contains(&c.logical_type), "{:?}", raw);
        }
        assert_eq!(classify("").native_type, "");
        assert_eq!(classify("varchar(1)(2)").length, 1);
    }

    #[test]
    fn test_strip_is_idempotent() {
        for raw in ["varchar(255)", "enum('a')", "int(11) unsigned", "text", "", "(x)"] {
            let once = strip_qualifier(raw);
            assert_eq!(strip_qualifier(once), once);
        }
    }

    #[test]
    fn test_classify_field_reports_only_unknown_types() {
        let sink = RecordingSink::new();

        let known = classify_field("id", "int(11)", &sink);
        assert_eq!(known.logical_type, LogicalType::Int);
        assert!(sink.is_empty());

        let unknown = classify_field("Location", "point", &sink);
        assert_eq!(unknown.name, "Location");
        assert_eq!(unknown.logical_type, LogicalType::String);
        assert_eq!(unknown.native_type, "point");
        assert_eq!(unknown.length, NO_LENGTH);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].raw_type, "point");
        assert_eq!(events[0].field, unknown);
    }
}
