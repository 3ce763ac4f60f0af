//! Shared resolution of unique-field collisions.
//!
//! Entities declare their unique fields in a fixed order; when a candidate
//! collides with an existing row on several fields only the first one is
//! reported.

/// An entity (or input) carrying fields that must be unique across a table.
pub trait UniqueFields {
    /// `(field, value)` pairs in reporting order.
    fn unique_fields(&self) -> Vec<(&'static str, &str)>;
}

fn collision_rank<P, R>(proposed: &P, existing: &R) -> Option<usize>
where
    P: UniqueFields + ?Sized,
    R: UniqueFields + ?Sized,
{
    proposed
        .unique_fields()
        .iter()
        .zip(existing.unique_fields().iter())
        .position(|((_, a), (_, b))| a == b)
}

/// First field on which `proposed` collides with `existing`.
pub fn first_collision<P, R>(proposed: &P, existing: &R) -> Option<&'static str>
where
    P: UniqueFields + ?Sized,
    R: UniqueFields + ?Sized,
{
    collision_rank(proposed, existing).map(|i| proposed.unique_fields()[i].0)
}

/// Among `rows`, the one colliding with `proposed` on the earliest field.
pub fn earliest_collision<P, R>(proposed: &P, rows: Vec<R>) -> Option<R>
where
    P: UniqueFields + ?Sized,
    R: UniqueFields,
{
    rows.into_iter()
        .filter_map(|row| collision_rank(proposed, &row).map(|rank| (rank, row)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, row)| row)
}
