use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        got, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {got:?}"
    );
}

#[track_caller]
fn must_get_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    form.select(&Selector::parse("input").unwrap())
        .find(|input| input.value().attr("name") == Some(name))
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""))
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);
    let input_type = input.value().attr("type").unwrap_or_default();

    assert_eq!(
        input_type, type_,
        "want input {name} with type \"{type_}\", got {input_type:?}"
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );
}

#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    assert_form_input(form, name, type_);

    let input_value = must_get_input(form, name)
        .value()
        .attr("value")
        .unwrap_or_default();
    assert_eq!(
        input_value, value,
        "want input {name} with value \"{value}\", got {input_value:?}"
    );
}

/// Assert that the select `name` offers exactly `want_options` as
/// `(value, text)` pairs, ignoring the empty placeholder, and that
/// `want_selected` is the selected value.
#[track_caller]
pub(crate) fn assert_form_select(
    form: &ElementRef<'_>,
    name: &str,
    want_options: &[(&str, &str)],
    want_selected: Option<&str>,
) {
    let select = form
        .select(&Selector::parse("select").unwrap())
        .find(|select| select.value().attr("name") == Some(name))
        .unwrap_or_else(|| panic!("No select found with name \"{name}\""));

    let options = select
        .select(&Selector::parse("option").unwrap())
        .filter(|option| !option.value().attr("value").unwrap_or_default().is_empty())
        .collect::<Vec<_>>();

    let got_options = options
        .iter()
        .map(|option| {
            (
                option.value().attr("value").unwrap_or_default().to_owned(),
                option.text().collect::<String>().trim().to_owned(),
            )
        })
        .collect::<Vec<_>>();
    let want = want_options
        .iter()
        .map(|(value, text)| ((*value).to_owned(), (*text).to_owned()))
        .collect::<Vec<_>>();
    assert_eq!(got_options, want, "wrong options for select {name}");

    let got_selected = options
        .iter()
        .find(|option| option.value().attr("selected").is_some())
        .and_then(|option| option.value().attr("value"));
    assert_eq!(got_selected, want_selected, "wrong selection for {name}");
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let submit_button = form
        .select(&Selector::parse("button[type=submit]").unwrap())
        .next()
        .expect("No submit button found");

    let got_text = submit_button.text().collect::<String>();
    assert_eq!(text, got_text.trim());
}

/// Assert that the first error shown for `field` is `want_message`.
#[track_caller]
pub(crate) fn assert_field_error(html: &Html, field: &str, want_message: &str) {
    let selector = Selector::parse(&format!("p[data-field-error={field}]")).unwrap();
    let got_message = html
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No error message found for field {field}"))
        .text()
        .collect::<String>();

    assert_eq!(want_message, got_message.trim());
}

#[track_caller]
pub(crate) fn assert_no_field_errors(html: &Html) {
    let fields = html
        .select(&Selector::parse("p[data-field-error]").unwrap())
        .filter_map(|p| p.value().attr("data-field-error"))
        .collect::<Vec<_>>();

    assert!(fields.is_empty(), "want no field errors, got errors for {fields:?}");
}
