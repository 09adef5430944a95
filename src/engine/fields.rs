//! Ordered-candidate field lookup
//!
//! Merging a per-day override with its template default is a precedence
//! question, not a dictionary union: for each field independently, the first
//! candidate that carries a value wins. This module provides that lookup as
//! a single generic function.

/// Return the first present value of a field across ordered candidates.
///
/// `candidates` are scanned in the given order; `field` projects the wanted
/// field out of one candidate. Returns `None` when no candidate carries the
/// field. Pure function, no side effects.
pub fn first_present<'a, C, T: ?Sized>(
    candidates: &[&'a C],
    field: impl Fn(&'a C) -> Option<&'a T>,
) -> Option<&'a T> {
    candidates.iter().find_map(|candidate| field(candidate))
}
