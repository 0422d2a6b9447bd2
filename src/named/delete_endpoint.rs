use axum::{
    Extension,
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::UserID,
    db::DatabaseId,
    named::{NamedResource, NamedResourceState},
    resource::{DeleteOutcome, delete, delete_response},
};

/// A route handler for deleting an account or category.
///
/// Always redirects back to the list page with a flash message
/// describing what happened. Rows used by expenses are kept.
pub async fn delete_named_endpoint<R: NamedResource>(
    State(state): State<NamedResourceState>,
    Extension(user_id): Extension<UserID>,
    Path(id): Path<DatabaseId>,
    jar: PrivateCookieJar,
) -> Response {
    let outcome = match state.db_connection.lock() {
        Ok(connection) => delete::<R>(user_id, id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            DeleteOutcome::Failed
        }
    };

    delete_response::<R>(jar, outcome)
}

#[cfg(test)]
mod delete_named_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        body::Body,
        extract::{Path, State},
        http::{Response, StatusCode},
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{Account, get_account, insert_account},
        auth::UserID,
        category::{Category, get_category, insert_category},
        db::DatabaseId,
        endpoints,
        expense::{ExpenseFields, insert_expense},
        flash::Flash,
        named::{NamedResource, NamedResourceState},
        test_utils::{
            assert_hx_redirect, get_flash, get_test_connection, insert_test_user, test_jar,
        },
        validation::EntityName,
    };

    use super::delete_named_endpoint;

    struct Fixture {
        state: NamedResourceState,
        alice: UserID,
        bob: UserID,
        account: Account,
        category: Category,
    }

    fn get_fixture() -> Fixture {
        let connection = get_test_connection();
        let alice = insert_test_user("alice@example.com", &connection);
        let bob = insert_test_user("bob@example.com", &connection);
        let account =
            insert_account(alice, &EntityName::new_unchecked("Wallet"), &connection).unwrap();
        let category =
            insert_category(alice, &EntityName::new_unchecked("Food"), &connection).unwrap();

        Fixture {
            state: NamedResourceState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            alice,
            bob,
            account,
            category,
        }
    }

    fn add_expense(fixture: &Fixture, connection: &Connection) {
        let fields = ExpenseFields {
            account_id: fixture.account.id,
            category_id: fixture.category.id,
            description: "Lunch".to_owned(),
            amount: 12.5,
            date: time::macros::date!(2025 - 01 - 15),
        };
        insert_expense(fixture.alice, &fields, connection).unwrap();
    }

    async fn delete<R: NamedResource>(
        state: &NamedResourceState,
        user_id: UserID,
        id: DatabaseId,
    ) -> Response<Body> {
        delete_named_endpoint::<R>(State(state.clone()), Extension(user_id), Path(id), test_jar())
            .await
    }

    #[tokio::test]
    async fn owner_can_delete_account() {
        let fixture = get_fixture();

        let response = delete::<Account>(&fixture.state, fixture.alice, fixture.account.id).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::ACCOUNTS_VIEW);
        assert_eq!(
            get_flash(&response),
            Some(Flash::success("Account deleted successfully."))
        );
        assert_eq!(
            get_account(fixture.account.id, &fixture.state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn owner_can_delete_category() {
        let fixture = get_fixture();

        let response =
            delete::<Category>(&fixture.state, fixture.alice, fixture.category.id).await;

        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        assert_eq!(
            get_flash(&response),
            Some(Flash::success("Category deleted successfully."))
        );
        assert_eq!(
            get_category(fixture.category.id, &fixture.state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_twice_flashes_not_found() {
        let fixture = get_fixture();

        delete::<Account>(&fixture.state, fixture.alice, fixture.account.id).await;
        let response = delete::<Account>(&fixture.state, fixture.alice, fixture.account.id).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            get_flash(&response),
            Some(Flash::error(
                "The account could not be found. It may have already been deleted."
            ))
        );
    }

    #[tokio::test]
    async fn other_user_gets_error_flash_and_row_remains() {
        let fixture = get_fixture();

        let response = delete::<Category>(&fixture.state, fixture.bob, fixture.category.id).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        assert_eq!(get_flash(&response), Some(Flash::error("Unauthorized action.")));
        assert_eq!(
            get_category(fixture.category.id, &fixture.state.db_connection.lock().unwrap()),
            Ok(fixture.category)
        );
    }

    #[tokio::test]
    async fn account_with_expenses_is_kept() {
        let fixture = get_fixture();
        add_expense(&fixture, &fixture.state.db_connection.lock().unwrap());

        let response = delete::<Account>(&fixture.state, fixture.alice, fixture.account.id).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            get_flash(&response),
            Some(Flash::error(
                "Cannot delete this account because it has associated expenses."
            ))
        );
        assert_eq!(
            get_account(fixture.account.id, &fixture.state.db_connection.lock().unwrap()),
            Ok(fixture.account)
        );
    }

    #[tokio::test]
    async fn category_with_expenses_is_kept() {
        let fixture = get_fixture();
        add_expense(&fixture, &fixture.state.db_connection.lock().unwrap());

        let response =
            delete::<Category>(&fixture.state, fixture.alice, fixture.category.id).await;

        assert_eq!(
            get_flash(&response),
            Some(Flash::error(
                "Cannot delete this category because it has associated expenses."
            ))
        );
        assert_eq!(
            get_category(fixture.category.id, &fixture.state.db_connection.lock().unwrap()),
            Ok(fixture.category)
        );
    }
}
