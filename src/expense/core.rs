//! Defines the expense model and its database queries.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    db::DatabaseId,
    endpoints::{self, format_endpoint},
    ownership::Owned,
    resource::Resource,
};

/// Money spent from one of the user's accounts, filed under one of their categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: DatabaseId,
    /// The user that owns the expense.
    pub owner_user_id: UserID,
    /// The account the money was spent from.
    pub account_id: DatabaseId,
    /// The category the expense is filed under.
    pub category_id: DatabaseId,
    /// What the money was spent on.
    pub description: String,
    /// How much was spent. Negative amounts, e.g. refunds, are allowed.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
}

/// The fields of an expense that the user may set, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    /// The account the money was spent from.
    pub account_id: DatabaseId,
    /// The category to file the expense under.
    pub category_id: DatabaseId,
    /// What the money was spent on, trimmed and not empty.
    pub description: String,
    /// How much was spent.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
}

impl Owned for Expense {
    fn owner(&self) -> UserID {
        self.owner_user_id
    }
}

impl Resource for Expense {
    const LABEL: &'static str = "expense";
    const DELETED_MESSAGE: &'static str = "Expense deleted.";
    const LIST_VIEW: &'static str = endpoints::EXPENSES_VIEW;

    fn fetch(id: DatabaseId, connection: &Connection) -> Result<Self, Error> {
        get_expense(id, connection)
    }

    fn remove(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
        match connection.execute("DELETE FROM expenses WHERE id = ?1", [id])? {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}

/// Create the expenses table.
///
/// Accounts and categories cannot be deleted while an expense refers to them.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY,
            owner_user_id INTEGER NOT NULL REFERENCES users(id),
            account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
            category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_owner_user_id ON expenses(owner_user_id);
        CREATE INDEX IF NOT EXISTS idx_expenses_account_id ON expenses(account_id);
        CREATE INDEX IF NOT EXISTS idx_expenses_category_id ON expenses(category_id);",
    )
}

pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        owner_user_id: UserID::new(row.get(1)?),
        account_id: row.get(2)?,
        category_id: row.get(3)?,
        description: row.get(4)?,
        amount: row.get(5)?,
        date: row.get(6)?,
    })
}

/// Insert a new expense owned by `owner_user_id`.
///
/// # Errors
/// Returns [Error::ForeignKeyViolation] if the account or category no longer
/// exists, or [Error::SqlError] if there is some other SQL error.
pub fn insert_expense(
    owner_user_id: UserID,
    fields: &ExpenseFields,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "INSERT INTO expenses (owner_user_id, account_id, category_id, description, amount, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, owner_user_id, account_id, category_id, description, amount, date",
        )?
        .query_row(
            (
                owner_user_id.as_i64(),
                fields.account_id,
                fields.category_id,
                &fields.description,
                fields.amount,
                fields.date,
            ),
            map_expense_row,
        )
        .map_err(Error::from)
}

/// Retrieve the expense with `id`, whoever owns it.
///
/// # Errors
/// Returns [Error::NotFound] if there is no expense with `id`.
pub fn get_expense(id: DatabaseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, owner_user_id, account_id, category_id, description, amount, date
            FROM expenses WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_expense_row)
        .map_err(Error::from)
}

/// Overwrite the user editable fields of expense `id` if it belongs to `owner_user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if `owner_user_id` has no expense with `id`.
pub fn update_expense(
    id: DatabaseId,
    owner_user_id: UserID,
    fields: &ExpenseFields,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expenses
        SET account_id = ?1, category_id = ?2, description = ?3, amount = ?4, date = ?5
        WHERE id = ?6 AND owner_user_id = ?7",
        (
            fields.account_id,
            fields.category_id,
            &fields.description,
            fields.amount,
            fields.date,
            id,
            owner_user_id.as_i64(),
        ),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// An expense with the names of its account and category, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseTableRow {
    pub description: String,
    pub amount: f64,
    pub date: Date,
    pub account: String,
    pub category: String,
    pub edit_url: String,
    pub delete_url: String,
}

/// Get the expenses owned by `owner_user_id`, newest first.
///
/// Expenses on the same date are ordered newest ID first.
pub fn get_expense_table_rows(
    owner_user_id: UserID,
    connection: &Connection,
) -> Result<Vec<ExpenseTableRow>, Error> {
    connection
        .prepare(
            "SELECT expenses.id, expenses.description, expenses.amount, expenses.date,
                accounts.name, categories.name
            FROM expenses
            INNER JOIN accounts ON accounts.id = expenses.account_id
            INNER JOIN categories ON categories.id = expenses.category_id
            WHERE expenses.owner_user_id = ?1
            ORDER BY expenses.date DESC, expenses.id DESC",
        )?
        .query_map([owner_user_id.as_i64()], |row| {
            let id = row.get(0)?;

            Ok(ExpenseTableRow {
                description: row.get(1)?,
                amount: row.get(2)?,
                date: row.get(3)?,
                account: row.get(4)?,
                category: row.get(5)?,
                edit_url: format_endpoint(endpoints::EDIT_EXPENSE_VIEW, id),
                delete_url: format_endpoint(endpoints::EXPENSE, id),
            })
        })?
        .map(|row_result| row_result.map_err(Error::from))
        .collect()
}
