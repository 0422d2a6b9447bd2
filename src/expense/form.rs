//! The expense form, shared by the create and edit pages, and its validation.

use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    account::{Account, get_account, get_accounts_by_owner},
    auth::UserID,
    category::{Category, get_categories_by_owner, get_category},
    db::DatabaseId,
    endpoints,
    expense::core::{Expense, ExpenseFields},
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, field_errors, labelled_input,
        submit_button,
    },
    name_form::FormMethod,
    ownership::owns,
    validation::{ValidationErrors, required_message, required_text},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

pub const INVALID_ACCOUNT_ERROR_MSG: &str = "The selected account is invalid.";
pub const INVALID_CATEGORY_ERROR_MSG: &str = "The selected category is invalid.";
pub const INVALID_AMOUNT_ERROR_MSG: &str = "The amount field must be a number.";
pub const INVALID_DATE_ERROR_MSG: &str = "The date field must be a valid date.";

/// The raw data entered by the user in the expense form.
///
/// Every field is optional so that missing fields are reported next to the
/// field instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
}

impl ExpenseForm {
    /// A blank form with `date` filled in.
    pub fn with_date(date: Date) -> Self {
        Self {
            date: Some(date.to_string()),
            ..Default::default()
        }
    }
}

impl From<&Expense> for ExpenseForm {
    fn from(expense: &Expense) -> Self {
        Self {
            account_id: Some(expense.account_id.to_string()),
            category_id: Some(expense.category_id.to_string()),
            description: Some(expense.description.clone()),
            amount: Some(format!("{:.2}", expense.amount)),
            date: Some(expense.date.to_string()),
        }
    }
}

/// Check every field of `form`, looking up the referenced account and
/// category on behalf of `user_id`.
///
/// An account or category that does not exist, or that belongs to another
/// user, is reported the same way so that other users' rows stay hidden.
///
/// # Errors
/// Returns [Error::Validation] with the errors for each bad field, or another
/// error if the database could not be queried.
pub fn validate_expense_form(
    form: &ExpenseForm,
    user_id: UserID,
    connection: &Connection,
) -> Result<ExpenseFields, Error> {
    let mut errors = ValidationErrors::default();

    let account_id = validate_reference(
        form.account_id.as_deref(),
        "account_id",
        "account",
        INVALID_ACCOUNT_ERROR_MSG,
        |id| get_account(id, connection).map(|account| owns(&account, user_id)),
        &mut errors,
    )?;

    let category_id = validate_reference(
        form.category_id.as_deref(),
        "category_id",
        "category",
        INVALID_CATEGORY_ERROR_MSG,
        |id| get_category(id, connection).map(|category| owns(&category, user_id)),
        &mut errors,
    )?;

    let description = required_text(
        form.description.as_deref(),
        "description",
        "description",
        &mut errors,
    );

    let amount = required_text(form.amount.as_deref(), "amount", "amount", &mut errors).and_then(
        |amount| match amount.parse::<f64>() {
            Ok(amount) if amount.is_finite() => Some(amount),
            _ => {
                errors.add("amount", INVALID_AMOUNT_ERROR_MSG);
                None
            }
        },
    );

    let date = required_text(form.date.as_deref(), "date", "date", &mut errors).and_then(
        |date| match Date::parse(&date, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add("date", INVALID_DATE_ERROR_MSG);
                None
            }
        },
    );

    match (account_id, category_id, description, amount, date) {
        (Some(account_id), Some(category_id), Some(description), Some(amount), Some(date))
            if errors.is_empty() =>
        {
            Ok(ExpenseFields {
                account_id,
                category_id,
                description,
                amount,
                date,
            })
        }
        _ => Err(Error::Validation(errors)),
    }
}

/// Check a submitted account or category ID.
///
/// `is_owned` returns whether the row belongs to the acting user, or
/// [Error::NotFound] if there is no such row.
fn validate_reference(
    value: Option<&str>,
    field: &'static str,
    field_label: &str,
    invalid_message: &str,
    is_owned: impl FnOnce(DatabaseId) -> Result<bool, Error>,
    errors: &mut ValidationErrors,
) -> Result<Option<DatabaseId>, Error> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        errors.add(field, required_message(field_label));
        return Ok(None);
    };

    let Ok(id) = value.parse::<DatabaseId>() else {
        errors.add(field, invalid_message);
        return Ok(None);
    };

    match is_owned(id) {
        Ok(true) => Ok(Some(id)),
        Ok(false) => {
            tracing::warn!("rejected reference to {field_label} {id} owned by another user");
            errors.add(field, invalid_message);
            Ok(None)
        }
        Err(Error::NotFound) => {
            errors.add(field, invalid_message);
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// The acting user's accounts and categories, offered in the form's selects.
pub fn get_form_options(
    user_id: UserID,
    connection: &Connection,
) -> Result<(Vec<Account>, Vec<Category>), Error> {
    Ok((
        get_accounts_by_owner(user_id, connection)?,
        get_categories_by_owner(user_id, connection)?,
    ))
}

/// Everything needed to render the expense form.
pub struct ExpenseFormProps<'a> {
    /// Where the form is submitted.
    pub action: &'a str,
    pub method: FormMethod,
    /// The values to prefill, e.g. the rejected submission.
    pub values: &'a ExpenseForm,
    pub errors: &'a ValidationErrors,
    /// The acting user's accounts, offered in the account select.
    pub accounts: &'a [Account],
    /// The acting user's categories, offered in the category select.
    pub categories: &'a [Category],
    pub submit_text: &'a str,
}

fn select_field<'a>(
    name: &'static str,
    label: &str,
    placeholder: &str,
    options: impl Iterator<Item = (DatabaseId, &'a str)>,
    selected: Option<&str>,
    errors: &ValidationErrors,
) -> Markup {
    let selected = selected.map(str::trim);

    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) required class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { (placeholder) }

                @for (id, option_name) in options {
                    @let value = id.to_string();
                    option value=(value) selected[selected == Some(value.as_str())] { (option_name) }
                }
            }

            (field_errors(errors, name))
        }
    }
}

/// A hint linking to the page where a missing account or category can be created.
fn missing_prerequisite(message: &str, create_url: &str, create_text: &str) -> Markup {
    html! {
        p class="text-sm text-gray-600 dark:text-gray-300" data-missing-prerequisite="true"
        {
            (message) " "
            a href=(create_url) class=(LINK_STYLE) { (create_text) }
            "."
        }
    }
}

pub fn expense_form(props: &ExpenseFormProps<'_>) -> Markup {
    let (hx_post, hx_put) = match props.method {
        FormMethod::Post => (Some(props.action), None),
        FormMethod::Put => (None, Some(props.action)),
    };
    let values = props.values;
    let errors = props.errors;

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            @if props.accounts.is_empty() {
                (missing_prerequisite(
                    "You need an account before you can record expenses.",
                    endpoints::NEW_ACCOUNT_VIEW,
                    "Create an account",
                ))
            }

            @if props.categories.is_empty() {
                (missing_prerequisite(
                    "You need a category before you can record expenses.",
                    endpoints::NEW_CATEGORY_VIEW,
                    "Create a category",
                ))
            }

            (select_field(
                "account_id",
                "Account",
                "Select an account",
                props.accounts.iter().map(|account| (account.id, account.name.as_ref())),
                values.account_id.as_deref(),
                errors,
            ))

            (select_field(
                "category_id",
                "Category",
                "Select a category",
                props.categories.iter().map(|category| (category.id, category.name.as_ref())),
                values.category_id.as_deref(),
                errors,
            ))

            (labelled_input(
                "Description",
                "description",
                "text",
                values.description.as_deref().unwrap_or_default(),
                errors,
            ))

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    required
                    value=[values.amount.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_errors(errors, "amount"))
            }

            (labelled_input(
                "Date",
                "date",
                "date",
                values.date.as_deref().unwrap_or_default(),
                errors,
            ))

            (submit_button(props.submit_text))
        }
    }
}

#[cfg(test)]
mod validate_expense_form_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{Account, insert_account},
        auth::UserID,
        category::{Category, insert_category},
        expense::core::ExpenseFields,
        test_utils::{get_test_connection, insert_test_user},
        validation::{EntityName, ValidationErrors},
    };

    use super::{
        ExpenseForm, INVALID_ACCOUNT_ERROR_MSG, INVALID_AMOUNT_ERROR_MSG,
        INVALID_CATEGORY_ERROR_MSG, INVALID_DATE_ERROR_MSG, validate_expense_form,
    };

    struct Fixture {
        connection: Connection,
        alice: UserID,
        account: Account,
        category: Category,
        bobs_account: Account,
        bobs_category: Category,
    }

    fn get_fixture() -> Fixture {
        let connection = get_test_connection();
        let alice = insert_test_user("alice@example.com", &connection);
        let bob = insert_test_user("bob@example.com", &connection);
        let name = EntityName::new_unchecked;

        Fixture {
            account: insert_account(alice, &name("Wallet"), &connection).unwrap(),
            category: insert_category(alice, &name("Food"), &connection).unwrap(),
            bobs_account: insert_account(bob, &name("Bob's wallet"), &connection).unwrap(),
            bobs_category: insert_category(bob, &name("Bob's food"), &connection).unwrap(),
            alice,
            connection,
        }
    }

    fn valid_form(fixture: &Fixture) -> ExpenseForm {
        ExpenseForm {
            account_id: Some(fixture.account.id.to_string()),
            category_id: Some(fixture.category.id.to_string()),
            description: Some(" Lunch ".to_owned()),
            amount: Some("150.00".to_owned()),
            date: Some("2025-01-15".to_owned()),
        }
    }

    #[track_caller]
    fn must_get_errors(form: &ExpenseForm, fixture: &Fixture) -> ValidationErrors {
        match validate_expense_form(form, fixture.alice, &fixture.connection) {
            Err(Error::Validation(errors)) => errors,
            other => panic!("want validation errors, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_form() {
        let fixture = get_fixture();

        let fields = validate_expense_form(&valid_form(&fixture), fixture.alice, &fixture.connection);

        assert_eq!(
            fields,
            Ok(ExpenseFields {
                account_id: fixture.account.id,
                category_id: fixture.category.id,
                description: "Lunch".to_owned(),
                amount: 150.0,
                date: date!(2025 - 01 - 15),
            })
        );
    }

    #[test]
    fn accepts_negative_amount() {
        let fixture = get_fixture();
        let form = ExpenseForm {
            amount: Some("-20.5".to_owned()),
            ..valid_form(&fixture)
        };

        let fields = validate_expense_form(&form, fixture.alice, &fixture.connection).unwrap();

        assert_eq!(fields.amount, -20.5);
    }

    #[test]
    fn reports_every_missing_field() {
        let fixture = get_fixture();

        let errors = must_get_errors(&ExpenseForm::default(), &fixture);

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["account_id", "amount", "category_id", "date", "description"]
        );
        assert_eq!(
            errors.first("account_id"),
            Some("The account field is required.")
        );
        assert_eq!(
            errors.first("description"),
            Some("The description field is required.")
        );
    }

    #[test]
    fn rejects_malformed_values() {
        let fixture = get_fixture();
        let form = ExpenseForm {
            account_id: Some("abc".to_owned()),
            category_id: Some("1.5".to_owned()),
            amount: Some("twelve".to_owned()),
            date: Some("2025-02-30".to_owned()),
            ..valid_form(&fixture)
        };

        let errors = must_get_errors(&form, &fixture);

        assert_eq!(errors.first("account_id"), Some(INVALID_ACCOUNT_ERROR_MSG));
        assert_eq!(errors.first("category_id"), Some(INVALID_CATEGORY_ERROR_MSG));
        assert_eq!(errors.first("amount"), Some(INVALID_AMOUNT_ERROR_MSG));
        assert_eq!(errors.first("date"), Some(INVALID_DATE_ERROR_MSG));
        assert_eq!(errors.get("description"), None);
    }

    #[test]
    fn rejects_infinite_amount() {
        let fixture = get_fixture();
        let form = ExpenseForm {
            amount: Some("inf".to_owned()),
            ..valid_form(&fixture)
        };

        let errors = must_get_errors(&form, &fixture);

        assert_eq!(errors.first("amount"), Some(INVALID_AMOUNT_ERROR_MSG));
    }

    #[test]
    fn rejects_missing_references() {
        let fixture = get_fixture();
        let form = ExpenseForm {
            account_id: Some("999".to_owned()),
            category_id: Some("999".to_owned()),
            ..valid_form(&fixture)
        };

        let errors = must_get_errors(&form, &fixture);

        assert_eq!(errors.first("account_id"), Some(INVALID_ACCOUNT_ERROR_MSG));
        assert_eq!(errors.first("category_id"), Some(INVALID_CATEGORY_ERROR_MSG));
    }

    #[test]
    fn rejects_other_users_references() {
        let fixture = get_fixture();
        let form = ExpenseForm {
            account_id: Some(fixture.bobs_account.id.to_string()),
            category_id: Some(fixture.bobs_category.id.to_string()),
            ..valid_form(&fixture)
        };

        let errors = must_get_errors(&form, &fixture);

        assert_eq!(errors.first("account_id"), Some(INVALID_ACCOUNT_ERROR_MSG));
        assert_eq!(errors.first("category_id"), Some(INVALID_CATEGORY_ERROR_MSG));
    }
}
