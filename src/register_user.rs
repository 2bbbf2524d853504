//! The registration page for creating a new user account.
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
    AppState, Error, PasswordHash, ValidatedPassword,
    app_state::create_cookie_key,
    auth::{DEFAULT_COOKIE_DURATION, set_auth_cookie},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, email_input, link, loading_spinner,
        log_in_register, password_input,
    },
    internal_server_error::get_internal_server_error_redirect,
    user::create_user,
};

/// The minimum number of characters the password should have to be considered valid on the client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

pub fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

#[derive(Default)]
struct RegistrationFormErrors<'a> {
    email: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(email: &str, password: &str, errors: &RegistrationFormErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, errors.email))
            (password_input(password, PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, errors.confirm_password))

            button
                type="submit" id="submit-button" tabindex="0"
                class="w-full px-4 py-2 bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700
                    hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 text-white rounded"
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", "", &RegistrationFormErrors::default());
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl RegistrationState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(cookie_secret: &str, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: db_connection.clone(),
        }
    }
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Handler for registration requests.
///
/// On success the new user is logged in and the client redirected to the
/// transactions page. Validation failures re-render the form with an error
/// message next to the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let email: EmailAddress = match user_data.email.parse() {
        Ok(email) => email,
        Err(_) => {
            return registration_form(
                &user_data.email,
                &user_data.password,
                &RegistrationFormErrors {
                    email: Some("Please enter a valid email address."),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    let validated_password = match ValidatedPassword::new(&user_data.password) {
        Ok(password) => password,
        Err(error) => {
            return registration_form(
                &user_data.email,
                &user_data.password,
                &RegistrationFormErrors {
                    password: Some(error.to_string().as_ref()),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        return registration_form(
            &user_data.email,
            &user_data.password,
            &RegistrationFormErrors {
                confirm_password: Some("Passwords do not match"),
                ..Default::default()
            },
        )
        .into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("an error occurred while hashing a password: {e}");

            return get_internal_server_error_redirect();
        }
    };

    let create_result = create_user(
        email,
        password_hash,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    );

    let user = match create_result {
        Ok(user) => user,
        Err(Error::DuplicateEmail) => {
            return registration_form(
                &user_data.email,
                &user_data.password,
                &RegistrationFormErrors {
                    email: Some("An account with this email already exists, please log in instead."),
                    ..Default::default()
                },
            )
            .into_response();
        }
        Err(e) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {e}");

            return get_internal_server_error_redirect();
        }
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("An error occurred while setting the auth cookie: {e}");

            get_internal_server_error_redirect()
        }
    }
}


#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        body::Body,
        http::{Response, StatusCode},
        response::IntoResponse,
        routing::post,
    };
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        PasswordHash, endpoints,
        register_user::{RegisterForm, register_user},
        user::{create_user, create_user_table},
    };

    use super::RegistrationState;

    fn get_test_app_config() -> RegistrationState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        RegistrationState::new("42", Arc::new(Mutex::new(connection)))
    }

    fn get_test_server(state: RegistrationState) -> TestServer {
        let app = Router::new()
            .route(endpoints::USERS, post(register_user))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn create_user_succeeds() {
        let server = get_test_server(get_test_app_config());

        let response = server
            .post(endpoints::USERS)
            .form(&RegisterForm {
                email: "jane@example.com".to_string(),
                password: "iamtestingwhethericancreateanewuser".to_string(),
                confirm_password: "iamtestingwhethericancreateanewuser".to_string(),
            })
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::TRANSACTIONS_VIEW);
    }

    #[tokio::test]
    async fn create_user_fails_with_duplicate_email() {
        let state = get_test_app_config();
        create_user(
            "jane@example.com".parse().unwrap(),
            PasswordHash::from_raw_password("foobarbazquxgobbledygook", 4).unwrap(),
            &state
                .db_connection
                .lock()
                .expect("Could not acquire database connection"),
        )
        .expect("Could not create test user");
        let server = get_test_server(state);

        let response = server
            .post(endpoints::USERS)
            .form(&RegisterForm {
                email: "jane@example.com".to_string(),
                password: "averystrongandsecurepassword".to_string(),
                confirm_password: "averystrongandsecurepassword".to_string(),
            })
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_error_message(response.text().into_response(), "already exists").await;
    }

    #[tokio::test]
    async fn create_user_fails_with_invalid_email() {
        let server = get_test_server(get_test_app_config());

        let response = server
            .post(endpoints::USERS)
            .form(&RegisterForm {
                email: "notanemail".to_string(),
                password: "averystrongandsecurepassword".to_string(),
                confirm_password: "averystrongandsecurepassword".to_string(),
            })
            .await
            .text();

        assert_error_message(response.into_response(), "valid email").await;
    }

    #[tokio::test]
    async fn create_user_fails_when_password_is_weak() {
        let server = get_test_server(get_test_app_config());

        let response = server
            .post(endpoints::USERS)
            .form(&RegisterForm {
                email: "jane@example.com".to_string(),
                password: "foo".to_string(),
                confirm_password: "foo".to_string(),
            })
            .await
            .text();

        assert_error_message(response.into_response(), "password is too weak").await;
    }

    #[tokio::test]
    async fn create_user_fails_when_passwords_do_not_match() {
        let server = get_test_server(get_test_app_config());

        let response = server
            .post(endpoints::USERS)
            .form(&RegisterForm {
                email: "jane@example.com".to_string(),
                password: "iamtestingwhethericancreateanewuser".to_string(),
                confirm_password: "thisisadifferentpassword".to_string(),
            })
            .await
            .text();

        assert_error_message(response.into_response(), "passwords do not match").await;
    }

    #[track_caller]
    async fn assert_error_message(response: Response<Body>, want_message: &str) {
        let fragment = parse_html(response).await;

        let p_selector = scraper::Selector::parse("p.text-red-500").unwrap();
        let paragraphs = fragment.select(&p_selector).collect::<Vec<_>>();
        assert_eq!(paragraphs.len(), 1, "want 1 p, got {}", paragraphs.len());
        let paragraph = paragraphs.first().unwrap();
        let paragraph_text = paragraph.text().collect::<String>().to_lowercase();
        assert!(
            paragraph_text.contains(want_message),
            "'{paragraph_text}' does not contain the text '{want_message}'"
        );
    }

    async fn parse_html(response: Response<Body>) -> scraper::Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        scraper::Html::parse_fragment(&text)
    }
}
