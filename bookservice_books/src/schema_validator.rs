use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::{Book, BookUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    /// Every field including isbn must be present
    Create,
    /// Every field except isbn must be present, isbn comes from the path
    Update,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid book: {}", .0.join(", "))]
/// Non-empty, ordered list of human readable validation failures
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    String,
    NonEmptyString,
    Integer,
    PositiveInteger,
}

struct FieldRule {
    name: &'static str,
    aliases: &'static [&'static str],
    kind: FieldKind,
    create_only: bool,
}

const BOOK_SCHEMA: &[FieldRule] = &[
    FieldRule {
        name: "isbn",
        aliases: &[],
        kind: FieldKind::String,
        create_only: true,
    },
    FieldRule {
        name: "amazon_url",
        aliases: &["amazon-url"],
        kind: FieldKind::String,
        create_only: false,
    },
    FieldRule {
        name: "author",
        aliases: &[],
        kind: FieldKind::String,
        create_only: false,
    },
    FieldRule {
        name: "language",
        aliases: &[],
        kind: FieldKind::String,
        create_only: false,
    },
    FieldRule {
        name: "pages",
        aliases: &[],
        kind: FieldKind::PositiveInteger,
        create_only: false,
    },
    FieldRule {
        name: "publisher",
        aliases: &[],
        kind: FieldKind::String,
        create_only: false,
    },
    FieldRule {
        name: "title",
        aliases: &[],
        kind: FieldKind::NonEmptyString,
        create_only: false,
    },
    FieldRule {
        name: "year",
        aliases: &[],
        kind: FieldKind::Integer,
        create_only: false,
    },
];

impl FieldRule {
    fn applies_to(&self, mode: SchemaMode) -> bool {
        mode == SchemaMode::Create || !self.create_only
    }

    fn matches_key(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }

    fn is_integer(&self) -> bool {
        matches!(self.kind, FieldKind::Integer | FieldKind::PositiveInteger)
    }

    fn check(&self, value: &Value) -> Option<String> {
        match self.kind {
            FieldKind::String => match value.as_str() {
                Some(_) => None,
                None => Some(format!("{} must be a string", self.name)),
            },
            FieldKind::NonEmptyString => match value.as_str() {
                Some(s) if s.is_empty() => Some(format!("{} must not be empty", self.name)),
                Some(_) => None,
                None => Some(format!("{} must be a string", self.name)),
            },
            FieldKind::Integer | FieldKind::PositiveInteger => {
                let Some(number) = as_whole_number(value) else {
                    return Some(format!("{} must be an integer", self.name));
                };
                if i32::try_from(number).is_err() {
                    return Some(format!("{} is out of range", self.name));
                }
                if matches!(self.kind, FieldKind::PositiveInteger) && number < 1 {
                    return Some(format!("{} must be greater than 0", self.name));
                }
                None
            }
        }
    }
}

/// Integers written with a zero fraction, such as `1000.0`, count as integers
fn as_whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.fract() == 0.0)
            .map(|number| number as i64)
    })
}

/// Checks a book payload against the book schema for given mode.
/// Missing or mistyped fields are reported in schema order, then unrecognized keys.
pub fn validate(payload: &Value, mode: SchemaMode) -> Result<(), ValidationErrors> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationErrors::single("book must be an object"));
    };

    let mut errors: Vec<String> = BOOK_SCHEMA
        .iter()
        .filter(|rule| rule.applies_to(mode))
        .filter_map(|rule| check_field(object, rule))
        .collect();

    errors.extend(
        object
            .keys()
            .filter(|key| {
                !BOOK_SCHEMA
                    .iter()
                    .any(|rule| rule.applies_to(mode) && rule.matches_key(key))
            })
            .map(|key| format!("{} is not an allowed field", key)),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn check_field(object: &Map<String, Value>, rule: &FieldRule) -> Option<String> {
    let present: Vec<(&String, &Value)> = object
        .iter()
        .filter(|(key, _)| rule.matches_key(key))
        .collect();

    match present.as_slice() {
        [] => Some(format!("{} is required", rule.name)),
        [(_, value)] => rule.check(value),
        _ => Some(format!("{} is given more than once", rule.name)),
    }
}

/// Validates POST /books body, which wraps the book in a `book` key
pub fn validate_create_request(body: &Value) -> Result<Book, ValidationErrors> {
    let book = body
        .as_object()
        .and_then(|object| object.get("book"))
        .ok_or_else(|| ValidationErrors::single("book is required"))?;
    validate(book, SchemaMode::Create)?;
    into_typed(book)
}

/// Validates PUT /books/{isbn} body
pub fn validate_update_request(body: &Value) -> Result<BookUpdate, ValidationErrors> {
    validate(body, SchemaMode::Update)?;
    into_typed(body)
}

fn into_typed<T: DeserializeOwned>(value: &Value) -> Result<T, ValidationErrors> {
    let mut value = value.clone();
    if let Some(object) = value.as_object_mut() {
        for rule in BOOK_SCHEMA.iter().filter(|rule| rule.is_integer()) {
            if let Some(field) = object.get_mut(rule.name) {
                if let Some(number) = as_whole_number(field) {
                    *field = Value::from(number);
                }
            }
        }
    }
    T::deserialize(&value).map_err(|err| ValidationErrors::single(err.to_string()))
}
