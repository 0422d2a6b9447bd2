//! Displays the accounts or categories owned by the current user.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    endpoints::format_endpoint,
    flash::{Flash, take_flash},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, empty_state,
    },
    named::{NamedResource, NamedResourceState, get_named_by_owner},
    navigation::NavBar,
};

/// The row data to display in the view
#[derive(Debug, PartialEq)]
struct NamedTableRow {
    name: String,
    edit_url: String,
    delete_url: String,
}

fn list_view<R: NamedResource>(rows: &[NamedTableRow], flash: Option<Flash>) -> Markup {
    let nav_bar = NavBar::new(R::LIST_VIEW).into_html();

    let table_row = |row: &NamedTableRow| {
        let action_links = edit_delete_action_links(
            &row.edit_url,
            &row.delete_url,
            &format!(
                "Are you sure you want to delete the {} '{}'? This cannot be undone.",
                R::LABEL,
                row.name
            ),
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (row.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        @if let Some(flash) = flash {
            (flash.into_html())
        }

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-3xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { (R::PLURAL_TITLE) }

                    a href=(R::NEW_VIEW) class=(LINK_STYLE)
                    {
                        "Add " (R::TITLE)
                    }
                }

                @if rows.is_empty() {
                    (empty_state(
                        &format!("No {} yet.", R::PLURAL_TITLE.to_lowercase()),
                        R::NEW_VIEW,
                        R::CREATE_LINK_TEXT,
                    ))
                } @else {
                    div class="w-full overflow-x-auto dark:bg-gray-800"
                    {
                        table class="w-full text-sm text-left rtl:text-right
                            text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for row in rows {
                                    (table_row(row))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base(R::PLURAL_TITLE, &content)
}

/// Renders the list page for `R` showing the user's rows and any pending flash message.
pub async fn get_named_list_page<R: NamedResource>(
    State(state): State<NamedResourceState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rows = get_table_rows::<R>(user_id, &connection).inspect_err(|error| {
        tracing::error!("could not get {} for user {user_id}: {error}", R::TABLE)
    })?;

    let (jar, flash) = take_flash(jar);

    Ok((jar, list_view::<R>(&rows, flash)).into_response())
}

fn get_table_rows<R: NamedResource>(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<NamedTableRow>, Error> {
    let rows = get_named_by_owner::<R>(user_id, connection)?
        .into_iter()
        .map(|row| NamedTableRow {
            name: row.name().to_string(),
            edit_url: format_endpoint(R::EDIT_VIEW, row.id()),
            delete_url: format_endpoint(R::ITEM_API, row.id()),
        })
        .collect();

    Ok(rows)
}
