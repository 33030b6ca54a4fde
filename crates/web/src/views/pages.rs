//! Static pages: sign-in chooser, errors.

use super::html::{attr, escape};

/// `(route id, display name)` of each configured provider.
pub fn signin_page(providers: &[(&str, &str)]) -> String {
    if providers.is_empty() {
        return "<h1>Sign in</h1><p>Sign-in is not available right now.</p>".to_string();
    }
    let buttons: String = providers
        .iter()
        .map(|(id, name)| {
            format!(
                "<li><a class=\"provider\"{}>Sign in with {}</a></li>",
                attr("href", &format!("/auth/signin/{id}")),
                escape(name)
            )
        })
        .collect();
    format!("<h1>Sign in</h1><ul class=\"providers\">{buttons}</ul>")
}

pub fn not_found_page() -> String {
    "<h1>Not found</h1><p>We couldn't find that page.</p>\
     <p><a href=\"/\">Back to the shop</a></p>"
        .to_string()
}

pub fn failure_page() -> String {
    "<h1>Something went wrong</h1><p>Please try again in a moment.</p>\
     <p><a href=\"/\">Back to the shop</a></p>"
        .to_string()
}

/// Auth error page. `code` comes from the query string, so only known codes
/// get a specific message.
pub fn auth_error_page(code: &str) -> String {
    let message = match code {
        "AccessDenied" => "Sign-in was cancelled or denied.",
        "State" => "Your sign-in session expired. Please try again.",
        "Configuration" => "That sign-in method is not available.",
        "Callback" => "We couldn't complete sign-in with the provider.",
        _ => "Sign-in failed.",
    };
    format!(
        "<h1>Sign-in error</h1><p>{message}</p><p><a href=\"/auth/signin\">Try again</a></p>"
    )
}
