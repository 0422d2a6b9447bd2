use axum::{
    body::Body,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};

use crate::{
    app_state::create_cookie_key,
    flash::{Flash, set_flash, take_flash},
};

pub(crate) const TEST_COOKIE_SECRET: &str = "foobar";

/// An empty cookie jar using the same key as [get_flash].
pub(crate) fn test_jar() -> PrivateCookieJar {
    PrivateCookieJar::new(test_key())
}

fn test_key() -> Key {
    create_cookie_key(TEST_COOKIE_SECRET)
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let location = response
        .headers()
        .get("hx-redirect")
        .expect("Headers missing hx-redirect")
        .to_str()
        .expect("Could not convert to str");

    assert_eq!(location, endpoint);
}

/// Turn the cookies a response sets into the `Cookie` headers of a follow-up request.
fn request_cookie_headers(response: &Response<Body>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for set_cookie in response.headers().get_all(SET_COOKIE) {
        let cookie = Cookie::parse(
            set_cookie
                .to_str()
                .expect("set-cookie header is not a string")
                .to_owned(),
        )
        .expect("could not parse set-cookie header");

        headers.append(
            COOKIE,
            HeaderValue::from_str(&format!("{}={}", cookie.name(), cookie.value()))
                .expect("invalid cookie header"),
        );
    }

    headers
}

/// Decrypt the flash message a response sets, if any.
///
/// The response must have been built from a jar created with [test_jar].
#[track_caller]
pub(crate) fn get_flash(response: &Response<Body>) -> Option<Flash> {
    let headers = request_cookie_headers(response);

    take_flash(PrivateCookieJar::from_headers(&headers, test_key())).1
}

/// A request jar that arrives carrying `flash`, as if set by an earlier redirect.
#[track_caller]
pub(crate) fn jar_with_flash(flash: &Flash) -> PrivateCookieJar {
    let response = set_flash(test_jar(), flash)
        .expect("could not set flash")
        .into_response();
    let headers = request_cookie_headers(&response);

    PrivateCookieJar::from_headers(&headers, test_key())
}
