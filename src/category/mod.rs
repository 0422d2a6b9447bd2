mod core;

pub use core::{
    Category, create_category_table, get_categories_by_owner, get_category, insert_category,
};
