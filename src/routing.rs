//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{AuthState, auth_guard, auth_guard_hx},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    logging::logging_middleware,
    not_found::get_404_not_found,
    register_user::{get_register_page, register_user},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_edit_transaction_page, get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_guard,
        ));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .layer(middleware::from_fn_with_state(auth_state, auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, endpoints, pagination::PaginationConfig, routing::build_router,
    };

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().expect("could not open in-memory database"),
            "42",
            "Pacific/Auckland",
            PaginationConfig::default(),
        )
        .expect("could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn log_in_page_is_reachable_without_auth() {
        let server = get_test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn register_page_is_reachable_without_auth() {
        let server = get_test_server();

        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn transactions_page_redirects_to_log_in_without_auth() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS_VIEW).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found_page() {
        let server = get_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status_not_found();
        response.assert_text_contains("404");
    }
}
