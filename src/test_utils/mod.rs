#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use db::{get_test_connection, insert_test_user};
pub(crate) use form::{
    assert_field_error, assert_form_input, assert_form_input_with_value, assert_form_select,
    assert_form_submit_button_with_text, assert_hx_endpoint, assert_no_field_errors,
    must_get_form,
};
pub(crate) use html::{
    assert_valid_html, must_get_flash, must_get_table_rows, parse_html_document,
    parse_html_fragment,
};
pub(crate) use http::{
    assert_content_type, assert_hx_redirect, get_flash, jar_with_flash, test_jar,
};
