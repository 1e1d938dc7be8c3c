//! Integration tests for the SchoolCom portal.
//!
//! The full application (every layer, the seeded data set) runs in process;
//! requests go through `tower::ServiceExt::oneshot` and a small cookie jar
//! carries the session between them.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p schoolcom-integration-tests
//! ```

use std::collections::BTreeMap;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use schoolcom_portal::auth::IdentityDirectory;
use schoolcom_portal::config::PortalConfig;
use schoolcom_portal::i18n::Catalog;
use schoolcom_portal::models::PortalData;
use schoolcom_portal::state::AppState;
use tower::ServiceExt;

/// Largest response body the helpers will read.
const BODY_LIMIT: usize = 4 * 1024 * 1024;

/// A response reduced to what the tests look at.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// One browser: the app plus the cookies it has been given.
pub struct TestContext {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl TestContext {
    /// A fresh portal with seed data, no AI and no account table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded locales fail to load.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let catalog = Catalog::embedded().expect("embedded locales load");
        let state = AppState::new(
            PortalConfig::local(),
            catalog,
            IdentityDirectory::new(),
            None,
            PortalData::seed(),
        );
        Self {
            app: schoolcom_portal::app(state),
            cookies: BTreeMap::new(),
        }
    }

    fn cookie_header(&self) -> Option<String> {
        (!self.cookies.is_empty()).then(|| {
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ")
        })
    }

    fn store_cookies(&mut self, headers: &HeaderMap) {
        for raw in headers.get_all(header::SET_COOKIE) {
            let Ok(raw) = raw.to_str() else { continue };
            let Some((name, rest)) = raw.split_once('=') else { continue };
            let value = rest.split(';').next().unwrap_or_default();
            let expired = raw.to_ascii_lowercase().contains("max-age=0");
            if value.is_empty() || expired {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_owned(), value.to_owned());
            }
        }
    }

    /// Send a request with the stored cookies and keep any new ones.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body is not UTF-8.
    #[allow(clippy::expect_used)]
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = self.cookie_header() {
            request.headers_mut().insert(
                header::COOKIE,
                cookie.parse().expect("cookie header is valid"),
            );
        }
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        self.store_cookies(&headers);

        let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("body is readable");
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("body is UTF-8"),
        }
    }

    /// `GET path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid URI.
    #[allow(clippy::expect_used)]
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::get(path)
            .body(Body::empty())
            .expect("request builds");
        self.send(request).await
    }

    /// `POST path` with an urlencoded form.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid URI.
    #[allow(clippy::expect_used)]
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request builds");
        self.send(request).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid URI.
    #[allow(clippy::expect_used)]
    pub async fn post_json(&mut self, path: &str, json: &serde_json::Value) -> TestResponse {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request builds");
        self.send(request).await
    }

    /// Sign in and return the landing page the portal redirected to.
    ///
    /// # Panics
    ///
    /// Panics if sign-in does not redirect.
    #[allow(clippy::expect_used)]
    pub async fn login(&mut self, identifier: &str) -> String {
        let response = self.post_form("/login", &[("identifier", identifier)]).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
        response
            .location()
            .expect("sign-in redirects")
            .to_owned()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn find_attr<'a>(html: &'a str, attr: &str, prefix: &str, suffix: &str) -> Option<&'a str> {
    html.split(&format!("{attr}=\""))
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .find(|value| value.starts_with(prefix) && value.ends_with(suffix))
}

/// First `href` in `html` that starts with `prefix` and ends with `suffix`.
#[must_use]
pub fn find_link<'a>(html: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    find_attr(html, "href", prefix, suffix)
}

/// First form `action` in `html` that starts with `prefix` and ends with `suffix`.
#[must_use]
pub fn find_form_action<'a>(html: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    find_attr(html, "action", prefix, suffix)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_find_link_skips_non_matching() {
        let html = r#"<a href="/x/new">New</a><a href="/x/7/edit">Edit</a>"#;
        assert_eq!(find_link(html, "/x/", "/edit"), Some("/x/7/edit"));
        assert_eq!(find_link(html, "/y/", ""), None);
    }

    #[test]
    fn test_find_form_action() {
        let html = r#"<form action="/x"></form><form method="post" action="/x/7/delete"></form>"#;
        assert_eq!(find_form_action(html, "/x/", "/delete"), Some("/x/7/delete"));
        assert_eq!(find_link(html, "/x/", "/delete"), None);
    }
}
