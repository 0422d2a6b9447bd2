use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, UserID, create_user},
    db::initialize,
};

/// An in-memory database with every table created and foreign keys on.
#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize(&connection).expect("could not initialize test DB");

    connection
}

/// Register a user with a placeholder password hash and return their ID.
#[track_caller]
pub(crate) fn insert_test_user(email: &str, connection: &Connection) -> UserID {
    create_user(
        EmailAddress::new_unchecked(email),
        PasswordHash::new_unchecked("not-a-real-hash"),
        connection,
    )
    .unwrap_or_else(|error| panic!("could not create test user {email}: {error}"))
    .id
}
