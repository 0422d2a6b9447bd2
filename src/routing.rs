//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    account::Account,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    category::Category,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_create_expense_page, get_edit_expense_page, get_expenses_page,
    },
    internal_server_error::get_internal_server_error_page,
    landing::get_landing_page,
    named::{
        create_named_endpoint, delete_named_endpoint, edit_named_endpoint,
        get_create_named_page, get_edit_named_page, get_named_list_page,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_landing_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_create_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_named_list_page::<Account>))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_create_named_page::<Account>))
        .route(endpoints::EDIT_ACCOUNT_VIEW, get(get_edit_named_page::<Account>))
        .route(endpoints::CATEGORIES_VIEW, get(get_named_list_page::<Category>))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_create_named_page::<Category>))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_named_page::<Category>))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
            .route(
                endpoints::EXPENSE,
                put(edit_expense_endpoint).delete(delete_expense_endpoint),
            )
            .route(endpoints::ACCOUNTS_API, post(create_named_endpoint::<Account>))
            .route(
                endpoints::ACCOUNT,
                put(edit_named_endpoint::<Account>).delete(delete_named_endpoint::<Account>),
            )
            .route(endpoints::CATEGORIES_API, post(create_named_endpoint::<Category>))
            .route(
                endpoints::CATEGORY,
                put(edit_named_endpoint::<Category>).delete(delete_named_endpoint::<Category>),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
