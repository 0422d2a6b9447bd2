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

/// A label describing what money was spent on, e.g. food or rent.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: DatabaseId,
    pub owner_user_id: UserID,
    pub name: EntityName,
}

impl Owned for Category {
    fn owner(&self) -> UserID {
        self.owner_user_id
    }
}

impl Resource for Category {
    const LABEL: &'static str = "category";
    const DELETED_MESSAGE: &'static str = "Category deleted successfully.";
    const LIST_VIEW: &'static str = endpoints::CATEGORIES_VIEW;

    fn fetch(id: DatabaseId, connection: &Connection) -> Result<Self, Error> {
        get_named(id, connection)
    }

    fn remove(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
        remove_named::<Self>(id, connection)
    }
}

impl NamedResource for Category {
    const TABLE: &'static str = "categories";
    const TITLE: &'static str = "Category";
    const PLURAL_TITLE: &'static str = "Categories";
    const CREATE_LINK_TEXT: &'static str = "Create a category";

    const NEW_VIEW: &'static str = endpoints::NEW_CATEGORY_VIEW;
    const EDIT_VIEW: &'static str = endpoints::EDIT_CATEGORY_VIEW;
    const COLLECTION_API: &'static str = endpoints::CATEGORIES_API;
    const ITEM_API: &'static str = endpoints::CATEGORY;

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

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_named_table::<Category>(connection)
}

pub fn insert_category(
    owner_user_id: UserID,
    name: &EntityName,
    connection: &Connection,
) -> Result<Category, Error> {
    insert_named(owner_user_id, name, connection)
}

/// Retrieve the category with `id`, whoever owns it.
pub fn get_category(id: DatabaseId, connection: &Connection) -> Result<Category, Error> {
    get_named(id, connection)
}

/// Get the categories owned by `owner_user_id`, ordered by name.
pub fn get_categories_by_owner(
    owner_user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    get_named_by_owner(owner_user_id, connection)
}
