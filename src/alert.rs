//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the page's
//! alert container via `hx-target-error="#alert-container"`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with a short title and a longer explanation.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let color_class = match self.alert_type {
            AlertType::Success => {
                "text-green-800 border-green-300 bg-green-50 \
                dark:text-green-400 dark:border-green-800"
            }
            AlertType::Error => {
                "text-red-800 border-red-300 bg-red-50 \
                dark:text-red-400 dark:border-red-800"
            }
        };

        html! {
            div
                role="alert"
                class={ "flex items-start justify-between gap-3 p-4 mb-2 border rounded-lg \
                    shadow dark:bg-gray-800 " (color_class) }
            {
                div
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold cursor-pointer"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✕"
                }
            }
        }
    }
}

/// Render `alert` as an HTML fragment response with `status`.
pub fn render_alert(status: StatusCode, alert: Alert) -> Response {
    (status, alert.into_html()).into_response()
}
