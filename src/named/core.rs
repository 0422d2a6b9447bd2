use rusqlite::{Connection, Row};

use crate::{Error, auth::UserID, db::DatabaseId, resource::Resource, validation::EntityName};

/// A resource whose only user-editable field is its name, e.g. accounts and categories.
///
/// The handlers in [crate::named] are generic over this trait, so a new kind of
/// named row only needs a table and its routes.
pub trait NamedResource: Resource + Send + 'static {
    /// The table the rows are stored in, e.g. "accounts".
    const TABLE: &'static str;
    /// The title case name for one row, e.g. "Account".
    const TITLE: &'static str;
    /// The title case name for many rows, e.g. "Accounts".
    const PLURAL_TITLE: &'static str;
    /// The text of the empty-state link to the create page, e.g. "Create an account".
    const CREATE_LINK_TEXT: &'static str;

    /// The page with the create form.
    const NEW_VIEW: &'static str;
    /// The page with the edit form, with a single path parameter for the ID.
    const EDIT_VIEW: &'static str;
    /// The endpoint new rows are posted to.
    const COLLECTION_API: &'static str;
    /// The endpoint for updating and deleting one row, with a single path parameter for the ID.
    const ITEM_API: &'static str;

    fn from_parts(id: DatabaseId, owner_user_id: UserID, name: EntityName) -> Self;

    fn id(&self) -> DatabaseId;

    fn name(&self) -> &EntityName;
}

pub fn create_named_table<R: NamedResource>(
    connection: &Connection,
) -> Result<(), rusqlite::Error> {
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY,
            owner_user_id INTEGER NOT NULL REFERENCES users(id),
            name TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_owner_user_id ON {table}(owner_user_id);",
        table = R::TABLE
    ))
}

fn map_named_row<R: NamedResource>(row: &Row) -> Result<R, rusqlite::Error> {
    let id = row.get(0)?;
    let owner_user_id = UserID::new(row.get(1)?);
    let name: String = row.get(2)?;

    Ok(R::from_parts(id, owner_user_id, EntityName::new_unchecked(&name)))
}

/// Insert a new row owned by `owner_user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the row could not be inserted.
pub fn insert_named<R: NamedResource>(
    owner_user_id: UserID,
    name: &EntityName,
    connection: &Connection,
) -> Result<R, Error> {
    connection.execute(
        &format!("INSERT INTO {} (owner_user_id, name) VALUES (?1, ?2)", R::TABLE),
        (owner_user_id.as_i64(), name.as_ref()),
    )?;

    Ok(R::from_parts(
        connection.last_insert_rowid(),
        owner_user_id,
        name.clone(),
    ))
}

/// Retrieve the row with `id`, whoever owns it.
///
/// # Errors
/// Returns [Error::NotFound] if there is no row with `id`.
pub fn get_named<R: NamedResource>(id: DatabaseId, connection: &Connection) -> Result<R, Error> {
    connection
        .prepare(&format!(
            "SELECT id, owner_user_id, name FROM {} WHERE id = :id",
            R::TABLE
        ))?
        .query_one(&[(":id", &id)], map_named_row)
        .map_err(Error::from)
}

/// Rename the row `id` if it belongs to `owner_user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if `owner_user_id` has no row with `id`.
pub fn update_named<R: NamedResource>(
    id: DatabaseId,
    owner_user_id: UserID,
    name: &EntityName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!(
            "UPDATE {} SET name = ?1 WHERE id = ?2 AND owner_user_id = ?3",
            R::TABLE
        ),
        (name.as_ref(), id, owner_user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Get the rows owned by `owner_user_id`, ordered by name.
pub fn get_named_by_owner<R: NamedResource>(
    owner_user_id: UserID,
    connection: &Connection,
) -> Result<Vec<R>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, owner_user_id, name FROM {}
            WHERE owner_user_id = ?1
            ORDER BY name COLLATE NOCASE ASC, id ASC",
            R::TABLE
        ))?
        .query_map([owner_user_id.as_i64()], map_named_row)?
        .map(|row_result| row_result.map_err(Error::from))
        .collect()
}

/// Delete the row with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no row with `id`, or
/// [Error::ForeignKeyViolation] if expenses still reference it.
pub fn remove_named<R: NamedResource>(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    match connection.execute(&format!("DELETE FROM {} WHERE id = ?1", R::TABLE), [id])? {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}
