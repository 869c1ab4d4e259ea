//! Field validation and sanitization for submitted forms
//!
//! Each entity declares a rule table (see [`rules`]): an ordered list of fields, each with a
//! kind and an ordered list of checks. [`validate`] walks a table against the submitted
//! fields and always returns the sanitized values, together with any failures, so a rejected
//! form can be shown again with the cleaned input.

pub mod rules;

use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidateLength;

/// A submitted value: a single string, or every value sent under a repeated key
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Single(String),
    Many(Vec<String>),
}

/// Submitted fields in arrival order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields(IndexMap<String, RawValue>);

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value. A key seen twice turns into a list.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.get_mut(&key) {
            Some(existing) => {
                let previous = std::mem::replace(existing, RawValue::Many(Vec::new()));
                *existing = match previous {
                    RawValue::Single(first) => RawValue::Many(vec![first, value]),
                    RawValue::Many(mut values) => {
                        values.push(value);
                        RawValue::Many(values)
                    }
                };
            }
            None => {
                self.0.insert(key, RawValue::Single(value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = RawFields::new();
        for (key, value) in iter {
            fields.push(key, value);
        }
        fields
    }
}

/// How a field is read and sanitized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed and HTML-escaped
    Text,
    /// Parsed to a calendar date; blank means absent
    Date,
    /// Zero or more values; a single value becomes a one-element list
    List,
}

/// One check applied to a field value, with the message reported when it fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Required(&'static str),
    MaxLength(u64, &'static str),
    Alphanumeric(&'static str),
    IsoDate(&'static str),
    Identifier(&'static str),
    OneOf(&'static [&'static str], &'static str),
}

impl Check {
    fn message(&self) -> &'static str {
        match self {
            Check::Required(m)
            | Check::MaxLength(_, m)
            | Check::Alphanumeric(m)
            | Check::IsoDate(m)
            | Check::Identifier(m)
            | Check::OneOf(_, m) => *m,
        }
    }

    fn passes(&self, value: &str) -> bool {
        let owned = value.to_string();
        match self {
            Check::Required(_) => owned.validate_length(Some(1u64), None, None),
            Check::MaxLength(max, _) => owned.validate_length(None, Some(*max), None),
            Check::Alphanumeric(_) => {
                !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
            }
            Check::IsoDate(_) => parse_date(value).is_some(),
            Check::Identifier(_) => Uuid::parse_str(value).is_ok(),
            Check::OneOf(allowed, _) => allowed.iter().any(|a| *a == value),
        }
    }
}

/// Rule for a single field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    /// Optional fields are only checked when present and non-blank
    pub optional: bool,
    pub checks: &'static [Check],
}

/// A sanitized value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Date(Option<NaiveDate>),
    List(Vec<String>),
}

/// Sanitized values keyed by field, in rule order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sanitized(IndexMap<&'static str, Value>);

impl Sanitized {
    pub fn text(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::Text(s)) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        match self.0.get(field) {
            Some(Value::Date(d)) => *d,
            _ => None,
        }
    }

    pub fn list(&self, field: &str) -> Vec<String> {
        match self.0.get(field) {
            Some(Value::List(values)) => values.clone(),
            _ => Vec::new(),
        }
    }
}

/// A failed check on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    pub values: Sanitized,
    pub errors: Vec<FieldError>,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run a rule table against submitted fields.
///
/// Checks see the trimmed, unescaped value and stop at the first failure of each field.
/// Sanitization runs for every field whatever the outcome.
pub fn validate(rules: &[FieldRule], raw: &RawFields) -> Validated {
    let mut result = Validated::default();

    for rule in rules {
        match rule.kind {
            FieldKind::Text | FieldKind::Date => {
                let trimmed = single(raw.get(rule.field)).trim().to_string();
                if let Some(message) = first_failure(rule, &trimmed) {
                    result.errors.push(FieldError::new(rule.field, message));
                }
                let value = match rule.kind {
                    FieldKind::Date => Value::Date(parse_date(&trimmed)),
                    _ => Value::Text(escape(&trimmed)),
                };
                result.values.0.insert(rule.field, value);
            }
            FieldKind::List => {
                let items = list(raw.get(rule.field));
                for item in &items {
                    if let Some(message) = first_failure(rule, item) {
                        result.errors.push(FieldError::new(rule.field, message));
                        break;
                    }
                }
                let value = Value::List(items.iter().map(|item| escape(item)).collect());
                result.values.0.insert(rule.field, value);
            }
        }
    }

    result
}

fn first_failure(rule: &FieldRule, value: &str) -> Option<&'static str> {
    if rule.optional && value.is_empty() {
        return None;
    }
    rule.checks
        .iter()
        .find(|check| !check.passes(value))
        .map(Check::message)
}

fn single(value: Option<&RawValue>) -> &str {
    match value {
        Some(RawValue::Single(s)) => s,
        Some(RawValue::Many(values)) => values.first().map(String::as_str).unwrap_or(""),
        None => "",
    }
}

fn list(value: Option<&RawValue>) -> Vec<String> {
    let values: Vec<&String> = match value {
        Some(RawValue::Single(s)) => vec![s],
        Some(RawValue::Many(values)) => values.iter().collect(),
        None => Vec::new(),
    };
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Parse an ISO 8601 calendar date or full timestamp
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Replace HTML-significant characters with entities
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}
