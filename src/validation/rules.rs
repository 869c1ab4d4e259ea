//! Rule tables for each catalog entity

use super::{Check, FieldKind, FieldRule};
use crate::models::BookInstanceStatus;

pub const AUTHOR_RULES: &[FieldRule] = &[
    FieldRule {
        field: "first_name",
        kind: FieldKind::Text,
        optional: false,
        checks: &[
            Check::Required("First name must be specified."),
            Check::MaxLength(100, "First name must not exceed 100 characters."),
            Check::Alphanumeric("First name has non-alphanumeric characters."),
        ],
    },
    FieldRule {
        field: "family_name",
        kind: FieldKind::Text,
        optional: false,
        checks: &[
            Check::Required("Family name must be specified."),
            Check::MaxLength(100, "Family name must not exceed 100 characters."),
            Check::Alphanumeric("Family name has non-alphanumeric characters."),
        ],
    },
    FieldRule {
        field: "date_of_birth",
        kind: FieldKind::Date,
        optional: true,
        checks: &[Check::IsoDate("Invalid date of birth")],
    },
    FieldRule {
        field: "date_of_death",
        kind: FieldKind::Date,
        optional: true,
        checks: &[Check::IsoDate("Invalid date of death")],
    },
];

pub const GENRE_RULES: &[FieldRule] = &[FieldRule {
    field: "name",
    kind: FieldKind::Text,
    optional: false,
    checks: &[Check::Required("Genre name required")],
}];

pub const BOOK_RULES: &[FieldRule] = &[
    FieldRule {
        field: "title",
        kind: FieldKind::Text,
        optional: false,
        checks: &[Check::Required("Title must not be empty.")],
    },
    FieldRule {
        field: "author",
        kind: FieldKind::Text,
        optional: false,
        checks: &[
            Check::Required("Author must not be empty."),
            Check::Identifier("Author must be a valid author reference."),
        ],
    },
    FieldRule {
        field: "summary",
        kind: FieldKind::Text,
        optional: false,
        checks: &[Check::Required("Summary must not be empty.")],
    },
    FieldRule {
        field: "isbn",
        kind: FieldKind::Text,
        optional: false,
        checks: &[Check::Required("ISBN must not be empty")],
    },
    FieldRule {
        field: "genre",
        kind: FieldKind::List,
        optional: true,
        checks: &[Check::Identifier("Genre must be a valid genre reference.")],
    },
];

pub const BOOK_INSTANCE_RULES: &[FieldRule] = &[
    FieldRule {
        field: "book",
        kind: FieldKind::Text,
        optional: false,
        checks: &[
            Check::Required("Book must be specified"),
            Check::Identifier("Book must be a valid book reference."),
        ],
    },
    FieldRule {
        field: "imprint",
        kind: FieldKind::Text,
        optional: false,
        checks: &[Check::Required("Imprint must be specified")],
    },
    FieldRule {
        field: "status",
        kind: FieldKind::Text,
        optional: true,
        checks: &[Check::OneOf(BookInstanceStatus::NAMES, "Invalid status")],
    },
    FieldRule {
        field: "due_back",
        kind: FieldKind::Date,
        optional: true,
        checks: &[Check::IsoDate("Invalid date")],
    },
];
