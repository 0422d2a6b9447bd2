use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    db::DatabaseId,
    endpoints,
    named::{
        NamedResource, create_named_table, get_named, get_named_by_owner, insert_named,
        remove_named,
    },
    ownership::Owned,
    resource::Resource,
    validation::EntityName,
};

/// A place money is spent from, e.g. a bank account or a wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: DatabaseId,
    /// The user that owns the account.
    pub owner_user_id: UserID,
    /// The display name of the account.
    pub name: EntityName,
}

impl Owned for Account {
    fn owner(&self) -> UserID {
        self.owner_user_id
    }
}

impl Resource for Account {
    const LABEL: &'static str = "account";
    const DELETED_MESSAGE: &'static str = "Account deleted successfully.";
    const LIST_VIEW: &'static str = endpoints::ACCOUNTS_VIEW;

    fn fetch(id: DatabaseId, connection: &Connection) -> Result<Self, Error> {
        get_named(id, connection)
    }

    fn remove(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
        remove_named::<Self>(id, connection)
    }
}

impl NamedResource for Account {
    const TABLE: &'static str = "accounts";
    const TITLE: &'static str = "Account";
    const PLURAL_TITLE: &'static str = "Accounts";
    const CREATE_LINK_TEXT: &'static str = "Create an account";

    const NEW_VIEW: &'static str = endpoints::NEW_ACCOUNT_VIEW;
    const EDIT_VIEW: &'static str = endpoints::EDIT_ACCOUNT_VIEW;
    const COLLECTION_API: &'static str = endpoints::ACCOUNTS_API;
    const ITEM_API: &'static str = endpoints::ACCOUNT;

    fn from_parts(id: DatabaseId, owner_user_id: UserID, name: EntityName) -> Self {
        Self {
            id,
            owner_user_id,
            name,
        }
    }

    fn id(&self) -> DatabaseId {
        self.id
    }

    fn name(&self) -> &EntityName {
        &self.name
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_named_table::<Account>(connection)
}

/// Insert a new account owned by `owner_user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the account could not be inserted.
pub fn insert_account(
    owner_user_id: UserID,
    name: &EntityName,
    connection: &Connection,
) -> Result<Account, Error> {
    insert_named(owner_user_id, name, connection)
}

/// Retrieve the account with `id`, whoever owns it.
///
/// # Errors
/// Returns [Error::NotFound] if there is no account with `id`.
pub fn get_account(id: DatabaseId, connection: &Connection) -> Result<Account, Error> {
    get_named(id, connection)
}

/// Get the accounts owned by `owner_user_id`, ordered by name.
pub fn get_accounts_by_owner(
    owner_user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    get_named_by_owner(owner_user_id, connection)
}
