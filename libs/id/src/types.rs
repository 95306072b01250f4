//! Identifier definitions for all rota resources.

use crate::define_id;

define_id!(
    /// A person on the roster. Stable across renames; deleting the person
    /// retires the id rather than reusing it.
    PersonId,
    "psn"
);

define_id!(
    /// A shift definition (e.g. the APAC coverage shift). Editing the
    /// definition's fields never changes its id.
    ShiftId,
    "shf"
);

define_id!(
    /// One generated rota period. ULID ordering doubles as creation order,
    /// so sorting generation ids reproduces the append order of history.
    GenerationId,
    "gen"
);
