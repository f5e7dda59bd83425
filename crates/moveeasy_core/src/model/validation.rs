//! Declarative field constraints and the single validator consuming them.
//!
//! # Responsibility
//! - Keep every per-field text rule in one table per entity family.
//! - Report the first violated rule with a stable, human-readable message.
//!
//! # Invariants
//! - Lengths are counted in Unicode scalar values, not bytes.
//! - Fields without `Required` are only checked when non-empty.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

/// One text rule applied to a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Value must not be blank.
    Required,
    /// Inclusive character-count range.
    CharRange { min: usize, max: usize },
    /// Exact character count.
    ExactChars(usize),
    /// ASCII digits only.
    Digits,
}

/// Rules attached to one named field.
#[derive(Debug, Clone, Copy)]
pub struct FieldConstraint {
    pub field: &'static str,
    pub rules: &'static [FieldRule],
}

/// Exposes an entity's text fields by name to [`validate`].
pub trait FieldSource {
    /// Entity family name used in error messages (`address`, `contact`, ...).
    const ENTITY: &'static str;

    fn field(&self, name: &str) -> Option<&str>;
}

/// First rule violated by an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub entity: &'static str,
    pub field: &'static str,
    pub rule: FieldRule,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let field = self.field.replace('_', " ");
        match self.rule {
            FieldRule::Required => write!(f, "{} {field} is empty", self.entity),
            FieldRule::CharRange { min, max } => write!(
                f,
                "{} {field} must be between {min}-{max} characters",
                self.entity
            ),
            FieldRule::ExactChars(count) => write!(
                f,
                "{} {field} must have exactly {count} characters",
                self.entity
            ),
            FieldRule::Digits => write!(
                f,
                "{} {field} must contain only digits in range 0-9",
                self.entity
            ),
        }
    }
}

impl Error for ValidationError {}

const NAME_3_100: &[FieldRule] = &[FieldRule::Required, FieldRule::CharRange { min: 3, max: 100 }];
const NAME_3_255: &[FieldRule] = &[FieldRule::Required, FieldRule::CharRange { min: 3, max: 255 }];

pub const ADDRESS_CONSTRAINTS: &[FieldConstraint] = &[
    FieldConstraint {
        field: "street",
        rules: NAME_3_100,
    },
    FieldConstraint {
        field: "number",
        rules: &[FieldRule::Required, FieldRule::Digits],
    },
    FieldConstraint {
        field: "postal_code",
        rules: &[FieldRule::Required, FieldRule::ExactChars(8), FieldRule::Digits],
    },
    FieldConstraint {
        field: "neighborhood",
        rules: NAME_3_100,
    },
    FieldConstraint {
        field: "city",
        rules: NAME_3_100,
    },
    FieldConstraint {
        field: "state",
        rules: &[FieldRule::Required, FieldRule::ExactChars(2)],
    },
];

pub const CONTACT_CONSTRAINTS: &[FieldConstraint] = &[
    FieldConstraint {
        field: "name",
        rules: NAME_3_100,
    },
    FieldConstraint {
        field: "country_code",
        rules: &[FieldRule::Required, FieldRule::ExactChars(3), FieldRule::Digits],
    },
    FieldConstraint {
        field: "area_code",
        rules: &[FieldRule::Required, FieldRule::ExactChars(3), FieldRule::Digits],
    },
    FieldConstraint {
        field: "phone_number",
        rules: &[FieldRule::Required, FieldRule::ExactChars(9), FieldRule::Digits],
    },
];

pub const USER_CONSTRAINTS: &[FieldConstraint] = &[
    FieldConstraint {
        field: "email",
        rules: NAME_3_100,
    },
    FieldConstraint {
        field: "first_name",
        rules: &[FieldRule::CharRange { min: 1, max: 100 }],
    },
    FieldConstraint {
        field: "last_name",
        rules: &[FieldRule::CharRange { min: 1, max: 100 }],
    },
];

pub const BUS_STOP_CONSTRAINTS: &[FieldConstraint] = &[FieldConstraint {
    field: "name",
    rules: NAME_3_255,
}];

pub const BUS_LINE_CONSTRAINTS: &[FieldConstraint] = &[FieldConstraint {
    field: "name",
    rules: NAME_3_255,
}];

/// Checks `entity` against `constraints` in table order.
///
/// Returns the first violation; later fields are not inspected.
pub fn validate<T: FieldSource>(
    entity: &T,
    constraints: &[FieldConstraint],
) -> Result<(), ValidationError> {
    for constraint in constraints {
        let value = entity.field(constraint.field).unwrap_or_default();
        let required = constraint.rules.contains(&FieldRule::Required);
        if !required && value.is_empty() {
            continue;
        }

        for rule in constraint.rules {
            if !rule_holds(*rule, value) {
                return Err(ValidationError {
                    entity: T::ENTITY,
                    field: constraint.field,
                    rule: *rule,
                });
            }
        }
    }

    Ok(())
}

fn rule_holds(rule: FieldRule, value: &str) -> bool {
    match rule {
        FieldRule::Required => !value.trim().is_empty(),
        FieldRule::CharRange { min, max } => {
            let count = value.chars().count();
            count >= min && count <= max
        }
        FieldRule::ExactChars(expected) => value.chars().count() == expected,
        FieldRule::Digits => DIGITS_RE.is_match(value),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, FieldConstraint, FieldRule, FieldSource};

    struct Probe {
        code: String,
        note: String,
    }

    impl FieldSource for Probe {
        const ENTITY: &'static str = "probe";

        fn field(&self, name: &str) -> Option<&str> {
            match name {
                "code" => Some(&self.code),
                "note" => Some(&self.note),
                _ => None,
            }
        }
    }

    const PROBE_CONSTRAINTS: &[FieldConstraint] = &[
        FieldConstraint {
            field: "code",
            rules: &[FieldRule::Required, FieldRule::ExactChars(3), FieldRule::Digits],
        },
        FieldConstraint {
            field: "note",
            rules: &[FieldRule::CharRange { min: 2, max: 4 }],
        },
    ];

    fn probe(code: &str, note: &str) -> Probe {
        Probe {
            code: code.to_string(),
            note: note.to_string(),
        }
    }

    #[test]
    fn accepts_valid_values_and_skips_empty_optional_fields() {
        validate(&probe("055", ""), PROBE_CONSTRAINTS).unwrap();
        validate(&probe("055", "abc"), PROBE_CONSTRAINTS).unwrap();
    }

    #[test]
    fn reports_first_violated_rule_in_table_order() {
        let err = validate(&probe("", "x"), PROBE_CONSTRAINTS).unwrap_err();
        assert_eq!(err.field, "code");
        assert_eq!(err.rule, FieldRule::Required);
        assert_eq!(err.to_string(), "probe code is empty");

        let err = validate(&probe("5a5", ""), PROBE_CONSTRAINTS).unwrap_err();
        assert_eq!(err.rule, FieldRule::Digits);

        let err = validate(&probe("555", "toolong"), PROBE_CONSTRAINTS).unwrap_err();
        assert_eq!(err.field, "note");
        assert_eq!(err.to_string(), "probe note must be between 2-4 characters");
    }

    #[test]
    fn counts_characters_not_bytes() {
        validate(&probe("123", "ção"), PROBE_CONSTRAINTS).unwrap();
    }
}
