//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    app_state::create_cookie_key,
    auth::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, email_input, link, loading_spinner, log_in_register,
        password_input,
    },
    user::{User, get_user_by_email},
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

fn log_in_form(email: &str, error_message: Option<&str>) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, None))

            (password_input("", 0, error_message))

            div class="flex items-center gap-2"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    class="w-4 h-4 rounded border border-gray-300 dark:border-gray-600";

                label
                    for="remember_me"
                    class="text-sm text-gray-900 dark:text-white"
                {
                    "Remember me"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (spinner)
                }
                " Sign in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account yet? "
                (link(endpoints::REGISTER_VIEW, "Sign up"))
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let content = log_in_register("Sign in to your account", &log_in_form("", None));

    base("Sign In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl LoginState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(cookie_secret: &str, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: db_connection.clone(),
        }
    }
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the transactions page. Otherwise, the form is returned with
/// an error message explaining the problem.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let email = &user_data.email;
    let parsed_email: EmailAddress = match email.parse() {
        Ok(parsed_email) => parsed_email,
        // An unparseable email cannot match a stored user, so it gets the
        // same response as an unknown one.
        Err(_) => return create_log_in_error_response(email, INVALID_CREDENTIALS_ERROR_MSG),
    };
    let user: User = match get_user_by_email(
        &parsed_email,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire lock to database connection"),
    ) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return create_log_in_error_response(email, INVALID_CREDENTIALS_ERROR_MSG);
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return create_log_in_error_response(
                email,
                "An internal error occurred. Please try again later.",
            );
        }
    };

    let is_password_valid = match user.password_hash.verify(&user_data.password) {
        Ok(is_password_valid) => is_password_valid,
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return create_log_in_error_response(
                email,
                "An internal error occurred. Please try again later.",
            );
        }
    };

    if !is_password_valid {
        return create_log_in_error_response(email, INVALID_CREDENTIALS_ERROR_MSG);
    }

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match set_auth_cookie(jar.clone(), user.id, cookie_duration) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            updated_jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}

fn create_log_in_error_response(email: &str, error_message: &str) -> Response {
    (StatusCode::OK, log_in_form(email, Some(error_message))).into_response()
}

/// The raw data entered by the user in the log-in form.
///
/// The email and password are stored as plain strings. There is no need for validation here since
/// they will be compared against the email and password in the database, which have been verified.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,
}

#[cfg(test)]
mod log_in_page_tests {
    use std::collections::HashMap;

    use axum::http::{StatusCode, header::CONTENT_TYPE};
    use scraper::Html;

    use crate::endpoints;

    use super::get_log_in_page;

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        let document = scraper::Html::parse_document(&text);
        assert_valid_html(&document);

        let form_selector = scraper::Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());
        let form = forms.first().unwrap();
        let hx_post = form.value().attr("hx-post");
        assert_eq!(
            hx_post,
            Some(endpoints::LOG_IN_API),
            "want form with attribute hx-post=\"{}\", got {:?}",
            endpoints::LOG_IN_API,
            hx_post
        );

        let mut expected_form_elements: HashMap<&str, Vec<&str>> = HashMap::new();
        expected_form_elements.insert("input", vec!["email", "password", "checkbox"]);
        expected_form_elements.insert("button", vec!["submit"]);

        for (tag, element_types) in expected_form_elements {
            for element_type in element_types {
                let selector_string = format!("{tag}[type={element_type}]");
                let input_selector = scraper::Selector::parse(&selector_string).unwrap();
                let inputs = form.select(&input_selector).collect::<Vec<_>>();
                assert_eq!(
                    inputs.len(),
                    1,
                    "want 1 {element_type} {tag}, got {}",
                    inputs.len()
                );
            }
        }

        let register_link_selector = scraper::Selector::parse("a[href]").unwrap();
        let links = form.select(&register_link_selector).collect::<Vec<_>>();
        assert_eq!(links.len(), 1, "want 1 link, got {}", links.len());
        assert_eq!(
            links.first().unwrap().value().attr("href"),
            Some(endpoints::REGISTER_VIEW),
        );
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}\n{}",
            html.errors,
            html.html()
        );
    }
}

#[cfg(test)]
mod log_in_tests {
    use std::{
        collections::HashSet,
        sync::{Arc, Mutex},
    };

    use axum::{
        Form, Router,
        body::Body,
        extract::State,
        http::{Response, StatusCode, header::SET_COOKIE},
        routing::post,
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;

    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        PasswordHash, ValidatedPassword,
        auth::cookie::{COOKIE_EXPIRY, COOKIE_USER_ID},
        endpoints,
        user::{create_user, create_user_table},
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LogInData, LoginState, REMEMBER_ME_COOKIE_DURATION,
        post_log_in,
    };

    fn get_test_app_config(with_test_user: bool) -> LoginState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");

        create_user_table(&connection).expect("Could not create user table");

        if with_test_user {
            create_user(
                "test@test.com".parse().expect("Could not parse test email"),
                PasswordHash::new(
                    ValidatedPassword::new_unchecked("test"),
                    PasswordHash::DEFAULT_COST,
                )
                .expect("Could not hash test password"),
                &connection,
            )
            .expect("Could not create test user");
        }

        LoginState::new("foobar", Arc::new(Mutex::new(connection)))
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let state = get_test_app_config(true);

        let response = new_log_in_request(
            state,
            LogInData {
                email: "test@test.com".to_string(),
                password: "test".to_string(),
                remember_me: None,
            },
        )
        .await;

        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        assert_set_cookie(&response);
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr$(,)?) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(2),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let state = get_test_app_config(false);
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        let server = TestServer::new(app);

        server
            .post(endpoints::LOG_IN_API)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn form_deserialises() {
        let state = get_test_app_config(false);
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);
        let server = TestServer::new(app);
        let form = [
            ("email", "test@test.com"),
            ("password", "test"),
            ("remember_me", "on"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_ne!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn remember_me_extends_auth_cookie_through_form() {
        let state = get_test_app_config(true);
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);
        let server = TestServer::new(app);
        let form = [
            ("email", "test@test.com"),
            ("password", "test"),
            ("remember_me", "on"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

        let auth_cookie = response.cookie(COOKIE_USER_ID);
        assert_date_time_close!(
            auth_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + REMEMBER_ME_COOKIE_DURATION
        );
    }

    #[tokio::test]
    async fn form_deserialises_without_remember_me() {
        let state = get_test_app_config(false);
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);
        let server = TestServer::new(app);
        let form = [("email", "test@test.com"), ("password", "test")];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_ne!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_email() {
        let state = get_test_app_config(false);

        let response = new_log_in_request(
            state,
            LogInData {
                email: "wrong@email.com".to_string(),
                password: "test".to_string(),
                remember_me: None,
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, INVALID_CREDENTIALS_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn log_in_fails_with_malformed_email() {
        let state = get_test_app_config(true);

        let response = new_log_in_request(
            state,
            LogInData {
                email: "not an email".to_string(),
                password: "test".to_string(),
                remember_me: None,
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, INVALID_CREDENTIALS_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let state = get_test_app_config(true);

        let response = new_log_in_request(
            state,
            LogInData {
                email: "test@test.com".to_string(),
                password: "wrongpassword".to_string(),
                remember_me: None,
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, INVALID_CREDENTIALS_ERROR_MSG).await;
    }

    async fn new_log_in_request(state: LoginState, log_in_form: LogInData) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_log_in(State(state), jar, Form(log_in_form)).await
    }

    #[track_caller]
    fn assert_hx_redirect(response: &Response<Body>, want_location: &str) {
        let redirect_location = response.headers().get(HX_REDIRECT).unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect_location, want_location);
    }

    #[track_caller]
    fn assert_set_cookie(response: &Response<Body>) {
        let mut found_cookies = HashSet::new();

        for cookie_headers in response.headers().get_all(SET_COOKIE) {
            let cookie_string = cookie_headers.to_str().unwrap();
            let cookie = Cookie::parse(cookie_string).unwrap();

            match cookie.name() {
                COOKIE_USER_ID | COOKIE_EXPIRY => {
                    assert!(cookie.expires_datetime() > Some(OffsetDateTime::now_utc()));
                    found_cookies.insert(cookie.name().to_string());
                }
                _ => panic!("Unexpected cookie found: {}", cookie.name()),
            }
        }

        assert!(
            found_cookies.contains(COOKIE_USER_ID),
            "could not find cookie '{}' in {:?}",
            COOKIE_USER_ID,
            found_cookies
        );

        assert!(
            found_cookies.contains(COOKIE_EXPIRY),
            "could not find cookie '{}' in {:?}",
            COOKIE_EXPIRY,
            found_cookies
        );
    }

    async fn assert_body_contains_message(response: Response<Body>, message: &str) {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();

        let text = String::from_utf8_lossy(&body).to_string();

        assert!(
            text.contains(message),
            "response body should contain the text '{}' but got {}",
            message,
            text
        );
    }
}
