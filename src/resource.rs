//! Ownership-scoped lookups and deletes shared by accounts, categories and expenses.
//!
//! Editing a row the user does not own is refused outright with
//! [Error::Forbidden]. Deleting one is refused softly: the client is sent back
//! to the list page with an error flash, the same as any other failed delete.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    db::DatabaseId,
    flash::{Flash, set_flash},
    ownership::{Authorization, Owned, authorize},
};

/// A stored row that users create, edit and delete through the web pages.
pub trait Resource: Owned + Sized {
    /// Lower case name of the resource used in messages, e.g. "account".
    const LABEL: &'static str;

    /// The flash message shown after a successful delete.
    const DELETED_MESSAGE: &'static str;

    /// The page that lists the user's rows.
    const LIST_VIEW: &'static str;

    /// Fetch the row with `id`, returning [Error::NotFound] if there is none.
    fn fetch(id: DatabaseId, connection: &Connection) -> Result<Self, Error>;

    /// Delete the row with `id`, returning [Error::NotFound] if there is none.
    fn remove(id: DatabaseId, connection: &Connection) -> Result<(), Error>;
}

/// Fetch a row for editing on behalf of `acting_user`.
///
/// # Errors
/// Returns [Error::NotFound] if the row does not exist or [Error::Forbidden]
/// if it belongs to another user.
pub fn read_for_edit<R: Resource>(
    acting_user: UserID,
    id: DatabaseId,
    connection: &Connection,
) -> Result<R, Error> {
    let row = R::fetch(id, connection)?;

    match authorize(acting_user, &row) {
        Authorization::Allowed => Ok(row),
        Authorization::Denied => {
            tracing::warn!(
                "user {acting_user} tried to access {} {id} owned by user {}",
                R::LABEL,
                row.owner()
            );
            Err(Error::Forbidden)
        }
    }
}

/// The result of asking to delete a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row was removed.
    Deleted,
    /// There is no row with the requested ID.
    NotFound,
    /// The row belongs to another user and was left untouched.
    SoftForbidden,
    /// Other rows still reference the row, so it was left untouched.
    Conflict,
    /// An unexpected storage error occurred. The details have been logged.
    Failed,
}

impl DeleteOutcome {
    /// The flash message to show on the list page for resource `R`.
    pub fn flash<R: Resource>(self) -> Flash {
        match self {
            DeleteOutcome::Deleted => Flash::success(R::DELETED_MESSAGE),
            DeleteOutcome::NotFound => Flash::error(format!(
                "The {} could not be found. It may have already been deleted.",
                R::LABEL
            )),
            DeleteOutcome::SoftForbidden => Flash::error("Unauthorized action."),
            DeleteOutcome::Conflict => Flash::error(format!(
                "Cannot delete this {} because it has associated expenses.",
                R::LABEL
            )),
            DeleteOutcome::Failed => Flash::error(format!("Failed to delete {}.", R::LABEL)),
        }
    }
}

/// Delete the row with `id` on behalf of `acting_user`.
///
/// Storage errors are logged here and reported as [DeleteOutcome::Failed].
pub fn delete<R: Resource>(
    acting_user: UserID,
    id: DatabaseId,
    connection: &Connection,
) -> DeleteOutcome {
    let row = match R::fetch(id, connection) {
        Ok(row) => row,
        Err(Error::NotFound) => return DeleteOutcome::NotFound,
        Err(error) => {
            tracing::error!("could not fetch {} {id} for deletion: {error}", R::LABEL);
            return DeleteOutcome::Failed;
        }
    };

    if authorize(acting_user, &row) == Authorization::Denied {
        tracing::warn!(
            "user {acting_user} tried to delete {} {id} owned by user {}",
            R::LABEL,
            row.owner()
        );
        return DeleteOutcome::SoftForbidden;
    }

    match R::remove(id, connection) {
        Ok(()) => DeleteOutcome::Deleted,
        Err(Error::ForeignKeyViolation) => DeleteOutcome::Conflict,
        // Deleted by another request between the fetch and the delete.
        Err(Error::NotFound) => DeleteOutcome::NotFound,
        Err(error) => {
            tracing::error!("could not delete {} {id}: {error}", R::LABEL);
            DeleteOutcome::Failed
        }
    }
}

/// Respond to a delete request: flash the outcome and redirect to the list page.
pub fn delete_response<R: Resource>(jar: PrivateCookieJar, outcome: DeleteOutcome) -> Response {
    redirect_with_flash(jar, R::LIST_VIEW, outcome.flash::<R>())
}

/// Set `flash` and send the client to `location` with an HTMX redirect.
pub fn redirect_with_flash(jar: PrivateCookieJar, location: &str, flash: Flash) -> Response {
    match set_flash(jar, &flash) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(location.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set flash message \"{}\": {error}", flash.message);
            (HxRedirect(location.to_owned()), StatusCode::SEE_OTHER).into_response()
        }
    }
}

#[cfg(test)]
mod resource_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::UserID,
        db::DatabaseId,
        flash::FlashKind,
        ownership::Owned,
        resource::{DeleteOutcome, Resource, delete, read_for_edit},
    };

    #[derive(Debug, PartialEq)]
    struct Note {
        id: DatabaseId,
        owner_user_id: UserID,
    }

    impl Owned for Note {
        fn owner(&self) -> UserID {
            self.owner_user_id
        }
    }

    impl Resource for Note {
        const LABEL: &'static str = "note";
        const DELETED_MESSAGE: &'static str = "Note deleted successfully.";
        const LIST_VIEW: &'static str = "/notes";

        fn fetch(id: DatabaseId, connection: &Connection) -> Result<Self, Error> {
            connection
                .query_row(
                    "SELECT id, owner_user_id FROM notes WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(Note {
                            id: row.get(0)?,
                            owner_user_id: UserID::new(row.get(1)?),
                        })
                    },
                )
                .map_err(Error::from)
        }

        fn remove(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
            match connection.execute("DELETE FROM notes WHERE id = ?1", [id])? {
                0 => Err(Error::NotFound),
                _ => Ok(()),
            }
        }
    }

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(
                "PRAGMA foreign_keys = ON;
                CREATE TABLE notes (id INTEGER PRIMARY KEY, owner_user_id INTEGER NOT NULL);
                CREATE TABLE replies (
                    id INTEGER PRIMARY KEY,
                    note_id INTEGER NOT NULL REFERENCES notes(id) ON DELETE RESTRICT
                );
                INSERT INTO notes (id, owner_user_id) VALUES (1, 1), (2, 1);
                INSERT INTO replies (id, note_id) VALUES (1, 2);",
            )
            .unwrap();
        connection
    }

    #[test]
    fn owner_can_read_for_edit() {
        let connection = get_connection();

        let note = read_for_edit::<Note>(UserID::new(1), 1, &connection);

        assert_eq!(
            note,
            Ok(Note {
                id: 1,
                owner_user_id: UserID::new(1)
            })
        );
    }

    #[test]
    fn other_user_is_forbidden_from_reading_for_edit() {
        let connection = get_connection();

        let note = read_for_edit::<Note>(UserID::new(2), 1, &connection);

        assert_eq!(note, Err(Error::Forbidden));
    }

    #[test]
    fn read_for_edit_missing_row_is_not_found() {
        let connection = get_connection();

        let note = read_for_edit::<Note>(UserID::new(1), 99, &connection);

        assert_eq!(note, Err(Error::NotFound));
    }

    #[test]
    fn owner_can_delete() {
        let connection = get_connection();

        let outcome = delete::<Note>(UserID::new(1), 1, &connection);

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(Note::fetch(1, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_twice_is_not_found() {
        let connection = get_connection();

        delete::<Note>(UserID::new(1), 1, &connection);
        let outcome = delete::<Note>(UserID::new(1), 1, &connection);

        assert_eq!(outcome, DeleteOutcome::NotFound);
    }

    #[test]
    fn other_user_delete_is_soft_forbidden_and_row_remains() {
        let connection = get_connection();

        let outcome = delete::<Note>(UserID::new(2), 1, &connection);

        assert_eq!(outcome, DeleteOutcome::SoftForbidden);
        assert!(Note::fetch(1, &connection).is_ok());
    }

    #[test]
    fn referenced_row_delete_is_conflict_and_row_remains() {
        let connection = get_connection();

        let outcome = delete::<Note>(UserID::new(1), 2, &connection);

        assert_eq!(outcome, DeleteOutcome::Conflict);
        assert!(Note::fetch(2, &connection).is_ok());
    }

    #[test]
    fn flash_messages_describe_outcome() {
        let cases = [
            (
                DeleteOutcome::Deleted,
                FlashKind::Success,
                "Note deleted successfully.",
            ),
            (
                DeleteOutcome::NotFound,
                FlashKind::Error,
                "The note could not be found. It may have already been deleted.",
            ),
            (
                DeleteOutcome::SoftForbidden,
                FlashKind::Error,
                "Unauthorized action.",
            ),
            (
                DeleteOutcome::Conflict,
                FlashKind::Error,
                "Cannot delete this note because it has associated expenses.",
            ),
            (
                DeleteOutcome::Failed,
                FlashKind::Error,
                "Failed to delete note.",
            ),
        ];

        for (outcome, want_kind, want_message) in cases {
            let flash = outcome.flash::<Note>();

            assert_eq!(flash.kind, want_kind, "wrong kind for {outcome:?}");
            assert_eq!(flash.message, want_message, "wrong message for {outcome:?}");
        }
    }
}
