//! Pages and endpoints for resources that only have a name: accounts and categories.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod list_page;

pub use core::{
    NamedResource, create_named_table, get_named, get_named_by_owner, insert_named,
    remove_named, update_named,
};
pub use create_endpoint::create_named_endpoint;
pub use create_page::get_create_named_page;
pub use delete_endpoint::delete_named_endpoint;
pub use edit_endpoint::edit_named_endpoint;
pub use edit_page::get_edit_named_page;
pub use list_page::get_named_list_page;

/// The state shared by the handlers for named resources.
#[derive(Debug, Clone)]
pub struct NamedResourceState {
    /// The database connection for managing accounts and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NamedResourceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
