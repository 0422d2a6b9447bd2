//! Row ownership checks.
//!
//! Every account, category and expense belongs to exactly one user. Handlers
//! fetch the stored row and ask [authorize] whether the acting user may touch
//! it. The owner recorded in storage is the only input; any owner a client
//! submits is never read.

use crate::auth::UserID;

/// A stored row that belongs to a single user.
pub trait Owned {
    /// The user that owns the row.
    fn owner(&self) -> UserID;
}

/// Whether the acting user may read or change a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied,
}

/// Returns `true` if `row` belongs to `user_id`.
pub fn owns<T: Owned + ?Sized>(row: &T, user_id: UserID) -> bool {
    row.owner() == user_id
}

/// Decide whether `acting_user` may read or change `row`.
pub fn authorize<T: Owned + ?Sized>(acting_user: UserID, row: &T) -> Authorization {
    if owns(row, acting_user) {
        Authorization::Allowed
    } else {
        Authorization::Denied
    }
}
