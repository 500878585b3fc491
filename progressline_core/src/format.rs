//! Named-field template rendering
//!
//! Templates substitute `{name}` or `{name:spec}` placeholders from a field
//! map. The spec follows `[[fill]align][width][.precision][type]` where align
//! is `<`, `>` or `^` and type is `d` (integer), `f` (fixed-point) or `s`
//! (text). `{{` and `}}` produce literal braces.
//!
//! Rendering is fail-fast: a missing field, a value that does not fit its
//! specifier or a malformed template aborts the render and returns a
//! [`FormatError`] carrying the template and a dump of the fields.

use crate::error::FormatError;
use crate::utils::char_len;
use crate::{Error, Result};
use chrono::{DateTime, Local};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field map handed to templates
pub type Fields = BTreeMap<String, FieldValue>;

/// A value that can be substituted into a template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Time(DateTime<Local>),
}

impl FieldValue {
    /// Short type name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Time(_) => "timestamp",
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(_) | Self::Time(_) => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            // Whole floats print without a trailing ".0"
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{}", *value as i64)
            }
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Time(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S%.6f")),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Local>> for FieldValue {
    fn from(value: DateTime<Local>) -> Self {
        Self::Time(value)
    }
}

/// Render a map of fields as `{a: 1, b: "x"}` for error reports
pub fn describe_fields(fields: &Fields) -> String {
    let body = fields
        .iter()
        .map(|(name, value)| match value {
            FieldValue::Text(text) => format!("{name}: {text:?}"),
            other => format!("{name}: {other}"),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

/// A format string held by a widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render strictly: every referenced field must be present
    pub fn render(&self, fields: &Fields) -> Result<String> {
        render(&self.source, fields)
    }

    /// Render, treating absent `optional` fields as empty strings
    pub fn render_lenient(&self, fields: &Fields, optional: &[&str]) -> Result<String> {
        render_with(&self.source, fields, optional)
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

/// Substitute `fields` into `template`
pub fn render(template: &str, fields: &Fields) -> Result<String> {
    render_with(template, fields, &[])
}

/// Substitute `fields` into `template`, rendering absent `optional` fields empty
pub fn render_with(template: &str, fields: &Fields, optional: &[&str]) -> Result<String> {
    substitute(template, fields, optional)
        .inspect_err(|err| {
            debug!("Error while formatting {template:?}: {err}");
            debug!("Fields: {}", describe_fields(fields));
        })
        .map_err(Error::from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Left),
            '>' => Some(Self::Right),
            '^' => Some(Self::Center),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spec {
    fill: char,
    align: Option<Align>,
    width: usize,
    precision: Option<usize>,
    kind: Option<char>,
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            width: 0,
            precision: None,
            kind: None,
        }
    }
}

fn substitute(
    template: &str,
    fields: &Fields,
    optional: &[&str],
) -> std::result::Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }

                let mut body = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    match next {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => {
                            return Err(FormatError::syntax(
                                template,
                                position,
                                "nested '{' in placeholder",
                            ));
                        }
                        other => body.push(other),
                    }
                }
                if !closed {
                    return Err(FormatError::syntax(template, position, "unclosed '{'"));
                }

                let (name, spec) = match body.split_once(':') {
                    Some((name, spec)) => (name, parse_spec(template, position, spec)?),
                    None => (body.as_str(), Spec::default()),
                };
                if name.is_empty() {
                    return Err(FormatError::syntax(template, position, "empty field name"));
                }

                match fields.get(name) {
                    Some(value) => out.push_str(&format_value(template, name, value, &spec, fields)?),
                    None if optional.contains(&name) => {
                        out.push_str(&pad(String::new(), &spec, Align::Left));
                    }
                    None => {
                        return Err(FormatError::missing_field(
                            template,
                            name,
                            describe_fields(fields),
                        ));
                    }
                }
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(FormatError::syntax(template, position, "single '}'"));
                }
                out.push('}');
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn parse_spec(
    template: &str,
    position: usize,
    spec: &str,
) -> std::result::Result<Spec, FormatError> {
    let chars: Vec<char> = spec.chars().collect();
    let mut parsed = Spec::default();
    let mut i = 0;

    if let Some(align) = chars.get(1).copied().and_then(Align::from_char) {
        parsed.fill = chars[0];
        parsed.align = Some(align);
        i = 2;
    } else if let Some(align) = chars.first().copied().and_then(Align::from_char) {
        parsed.align = Some(align);
        i = 1;
    }

    let start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i > start {
        parsed.width = parse_number(template, position, &chars[start..i])?;
    }

    if chars.get(i) == Some(&'.') {
        i += 1;
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return Err(FormatError::syntax(
                template,
                position,
                "precision requires digits after '.'",
            ));
        }
        parsed.precision = Some(parse_number(template, position, &chars[start..i])?);
    }

    if let Some(&kind) = chars.get(i) {
        if !matches!(kind, 'd' | 'f' | 's') {
            return Err(FormatError::syntax(
                template,
                position,
                &format!("unknown format type '{kind}'"),
            ));
        }
        parsed.kind = Some(kind);
        i += 1;
    }

    if i != chars.len() {
        return Err(FormatError::syntax(
            template,
            position,
            &format!("invalid format spec '{spec}'"),
        ));
    }

    Ok(parsed)
}

fn parse_number(
    template: &str,
    position: usize,
    digits: &[char],
) -> std::result::Result<usize, FormatError> {
    digits
        .iter()
        .collect::<String>()
        .parse()
        .map_err(|_| FormatError::syntax(template, position, "number too large in format spec"))
}

fn format_value(
    template: &str,
    name: &str,
    value: &FieldValue,
    spec: &Spec,
    fields: &Fields,
) -> std::result::Result<String, FormatError> {
    let text = match (spec.kind, value) {
        (Some('d'), FieldValue::Int(int)) => int.to_string(),
        (Some('d'), FieldValue::Float(float)) => format!("{}", float.trunc() as i64),
        (Some('f'), FieldValue::Int(int)) => format!("{:.*}", spec.precision.unwrap_or(6), *int as f64),
        (Some('f'), FieldValue::Float(float)) => format!("{:.*}", spec.precision.unwrap_or(6), float),
        (Some(kind @ ('d' | 'f')), other) => {
            return Err(FormatError::type_mismatch(
                template,
                name,
                kind,
                other.kind(),
                describe_fields(fields),
            ));
        }
        (_, FieldValue::Float(float)) if spec.precision.is_some() => {
            format!("{:.*}", spec.precision.unwrap_or_default(), float)
        }
        (_, other) => {
            let text = other.to_string();
            match spec.precision {
                Some(precision) if !other.is_numeric() => text.chars().take(precision).collect(),
                _ => text,
            }
        }
    };

    let default_align = if value.is_numeric() {
        Align::Right
    } else {
        Align::Left
    };
    Ok(pad(text, spec, default_align))
}

fn pad(text: String, spec: &Spec, default_align: Align) -> String {
    let len = char_len(&text);
    if len >= spec.width {
        return text;
    }

    let missing = spec.width - len;
    let fill = |count: usize| std::iter::repeat_n(spec.fill, count).collect::<String>();
    match spec.align.unwrap_or(default_align) {
        Align::Left => format!("{text}{}", fill(missing)),
        Align::Right => format!("{}{text}", fill(missing)),
        Align::Center => format!("{}{text}{}", fill(missing / 2), fill(missing - missing / 2)),
    }
}
