//! User authentication with private cookies and route-guard middleware.

pub(crate) mod cookie;
mod middleware;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub(crate) use cookie::{invalidate_auth_cookie, set_auth_cookie};
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
