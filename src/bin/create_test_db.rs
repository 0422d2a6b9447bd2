use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    EntityName, ExpenseFields, PasswordHash, ValidatedPassword, create_user, initialize_db,
    insert_account, insert_category, insert_expense,
};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user test@example.com with the password 'test'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        EmailAddress::new_unchecked("test@example.com"),
        password_hash,
        &conn,
    )?;

    println!("Creating accounts, categories and expenses...");

    let name = |name: &str| EntityName::new(name).ok_or("empty name");
    let wallet = insert_account(user.id, &name("Wallet")?, &conn)?;
    let credit_card = insert_account(user.id, &name("Credit card")?, &conn)?;
    let groceries = insert_category(user.id, &name("Groceries")?, &conn)?;
    let transport = insert_category(user.id, &name("Transport")?, &conn)?;
    let eating_out = insert_category(user.id, &name("Eating out")?, &conn)?;

    let today = OffsetDateTime::now_utc().date();
    let samples = [
        (&wallet, &eating_out, "Coffee", 5.5),
        (&credit_card, &groceries, "Weekly shop", 142.37),
        (&wallet, &transport, "Bus fare", 3.2),
        (&credit_card, &eating_out, "Dinner with friends", 68.0),
        (&credit_card, &groceries, "Returned item", -12.99),
    ];

    for (days_ago, (account, category, description, amount)) in samples.into_iter().enumerate() {
        let fields = ExpenseFields {
            account_id: account.id,
            category_id: category.id,
            description: description.to_owned(),
            amount,
            date: today - Duration::days(days_ago as i64 * 3),
        };

        insert_expense(user.id, &fields, &conn)?;
    }

    println!("Success!");

    Ok(())
}
