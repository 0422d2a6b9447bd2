mod core;

pub use core::{Account, create_account_table, get_account, get_accounts_by_owner, insert_account};
