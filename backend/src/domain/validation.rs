//! Declarative field validation.
//!
//! Each mutating operation owns a static rule table: a list of fields,
//! each marked required or optional, with the semantic checks to run.
//! The evaluator runs every rule — not just the first failing one — and
//! returns all violations together, keyed by field name. Success
//! carries a normalized attribute set: strings trimmed (except secret
//! fields), emails lower-cased, numbers carried as JSON numbers.
//!
//! Validation is always the first step of a mutating pipeline; no
//! partial mutation can precede full validation success.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::error::{Error, FieldErrors};
use super::outcome::Outcome;

/// Closed category set for items.
pub const CATEGORIES: &[&str] = &["electronics", "books", "clothing", "food", "tools", "other"];

/// Closed role set for principals.
pub const ROLES: &[&str] = &["admin", "user"];

/// Address shape shared by the schemas and the [`Email`] newtype.
///
/// [`Email`]: super::principal::Email
pub(crate) fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[\w+\-.]+@[a-z\d-]+(\.[a-z\d-]+)*\.[a-z]+$")
            .expect("email pattern compiles")
    })
}

/// Semantic rule applied to a present field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Non-empty string once trimmed.
    Filled,
    /// Address shape, matched case-insensitively; normalized to lower
    /// case on success.
    Email,
    /// Minimum character count for secret fields.
    MinLen(usize),
    /// Numeric value ≥ 0 (price-like fields).
    NonNegativeNumber,
    /// Integer value ≥ 0 (quantity-like fields).
    NonNegativeInteger,
    /// Closed-set membership (role, category).
    OneOf(&'static [&'static str]),
    /// JSON boolean.
    Boolean,
}

/// One field of a schema.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    /// Secret fields keep caller whitespace and are never echoed back.
    pub secret: bool,
    pub checks: &'static [Check],
}

/// Declarative per-operation rule table.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [Field],
}

/// Login credentials: email and password.
pub const LOGIN_SCHEMA: Schema = Schema {
    fields: &[
        Field {
            name: "email",
            required: true,
            secret: false,
            checks: &[Check::Filled, Check::Email],
        },
        Field {
            name: "password",
            required: true,
            secret: true,
            checks: &[Check::Filled, Check::MinLen(6)],
        },
    ],
};

/// User creation and update payloads.
pub const USER_SCHEMA: Schema = Schema {
    fields: &[
        Field {
            name: "name",
            required: true,
            secret: false,
            checks: &[Check::Filled],
        },
        Field {
            name: "email",
            required: true,
            secret: false,
            checks: &[Check::Filled, Check::Email],
        },
        Field {
            name: "password",
            required: false,
            secret: true,
            checks: &[Check::Filled, Check::MinLen(6)],
        },
        Field {
            name: "role",
            required: false,
            secret: false,
            checks: &[Check::OneOf(ROLES)],
        },
        Field {
            name: "active",
            required: false,
            secret: false,
            checks: &[Check::Boolean],
        },
    ],
};

/// Item creation and update payloads. Ownership comes from the
/// authenticated caller, never from the payload.
pub const ITEM_SCHEMA: Schema = Schema {
    fields: &[
        Field {
            name: "name",
            required: true,
            secret: false,
            checks: &[Check::Filled],
        },
        Field {
            name: "description",
            required: false,
            secret: false,
            checks: &[],
        },
        Field {
            name: "category",
            required: false,
            secret: false,
            checks: &[Check::OneOf(CATEGORIES)],
        },
        Field {
            name: "price",
            required: false,
            secret: false,
            checks: &[Check::NonNegativeNumber],
        },
        Field {
            name: "quantity",
            required: false,
            secret: false,
            checks: &[Check::NonNegativeInteger],
        },
        Field {
            name: "active",
            required: false,
            secret: false,
            checks: &[Check::Boolean],
        },
    ],
};

/// Normalized attribute set produced by a successful validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    /// Raw normalized value, if the field was present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Borrowed string value.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Owned string value.
    pub fn string(&self, name: &str) -> Option<String> {
        self.str(name).map(str::to_owned)
    }

    /// Integer value.
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Float value.
    pub fn f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Boolean value.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// A string the schema guarantees is present. Absence indicates a
    /// broken schema, reported as an internal error rather than a panic.
    pub fn require_str(&self, name: &str) -> Outcome<&str> {
        self.str(name)
            .ok_or_else(|| Error::internal(format!("validated attribute missing: {name}")))
    }
}

impl Schema {
    /// Evaluate every field rule against the raw payload.
    ///
    /// All violations are reported together; success carries the
    /// normalized attributes of the fields that were present.
    pub fn validate(&self, raw: &Value) -> Outcome<Attributes> {
        let Some(object) = raw.as_object() else {
            return Err(Error::invalid_request("request body must be a JSON object"));
        };

        let mut violations = FieldErrors::new();
        let mut normalized = BTreeMap::new();

        for field in self.fields {
            match object.get(field.name).filter(|value| !value.is_null()) {
                None => {
                    if field.required {
                        push(&mut violations, field.name, "is missing");
                    }
                }
                Some(value) => {
                    let messages = check_value(field, value);
                    if messages.is_empty() {
                        normalized.insert(field.name.to_owned(), normalize(field, value));
                    } else {
                        for message in messages {
                            push(&mut violations, field.name, message);
                        }
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(Attributes(normalized))
        } else {
            Err(Error::validation(violations))
        }
    }

    /// The raw field table, useful for introspection.
    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }
}

fn push(violations: &mut FieldErrors, field: &str, message: impl Into<String>) {
    violations
        .entry(field.to_owned())
        .or_default()
        .push(message.into());
}

fn check_value(field: &Field, value: &Value) -> Vec<String> {
    let mut messages = Vec::new();
    for check in field.checks {
        if let Some(message) = run_check(*check, value) {
            messages.push(message);
        }
    }
    messages
}

// Violation messages never echo the offending value, so secret fields
// stay out of responses and logs.
fn run_check(check: Check, value: &Value) -> Option<String> {
    match check {
        Check::Filled => match value.as_str() {
            Some(s) if !s.trim().is_empty() => None,
            Some(_) => Some("must be filled".to_owned()),
            None => Some("must be a string".to_owned()),
        },
        Check::Email => match value.as_str() {
            Some(s) if email_pattern().is_match(s.trim()) => None,
            Some(_) => Some("must be a valid email address".to_owned()),
            None => Some("must be a string".to_owned()),
        },
        Check::MinLen(min) => match value.as_str() {
            Some(s) if s.chars().count() >= min => None,
            Some(_) => Some(format!("must be at least {min} characters")),
            None => Some("must be a string".to_owned()),
        },
        Check::NonNegativeNumber => match value.as_f64() {
            Some(n) if n >= 0.0 => None,
            Some(_) => Some("must be greater than or equal to 0".to_owned()),
            None => Some("must be a number".to_owned()),
        },
        Check::NonNegativeInteger => match value.as_i64() {
            Some(n) if n >= 0 => None,
            Some(_) => Some("must be greater than or equal to 0".to_owned()),
            None if value.is_number() => Some("must be an integer".to_owned()),
            None => Some("must be a number".to_owned()),
        },
        Check::OneOf(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s.trim()) => None,
            Some(_) => Some(format!("must be one of: {}", allowed.join(", "))),
            None => Some("must be a string".to_owned()),
        },
        Check::Boolean => {
            if value.is_boolean() {
                None
            } else {
                Some("must be boolean".to_owned())
            }
        }
    }
}

fn normalize(field: &Field, value: &Value) -> Value {
    match value {
        Value::String(s) => {
            if field.secret {
                Value::String(s.clone())
            } else if field.checks.contains(&Check::Email) {
                Value::String(s.trim().to_lowercase())
            } else {
                Value::String(s.trim().to_owned())
            }
        }
        other => other.clone(),
    }
}
