use crate::config::SiteSettings;
use crate::context::SessionContext;

use super::html::{attr, escape};

const CART_CSS: &str = "https://cdn.snipcart.com/themes/v3.7.1/default/snipcart.css";
const CART_JS: &str = "https://cdn.snipcart.com/themes/v3.7.1/default/snipcart.js";

fn header(site: &SiteSettings, session: &SessionContext) -> String {
    let account = match session.user() {
        Some(user) => {
            let name = user.name.as_deref().or(user.email.as_deref()).unwrap_or("Account");
            let avatar = user
                .image
                .as_deref()
                .map(|src| {
                    format!(
                        "<img class=\"avatar\"{}{} />",
                        attr("src", src),
                        attr("alt", name)
                    )
                })
                .unwrap_or_default();
            format!(
                "<span class=\"account\">{avatar}<span class=\"account-name\">{}</span></span>\
                 <form method=\"post\" action=\"/auth/signout\">\
                 <button type=\"submit\">Sign out</button></form>",
                escape(name)
            )
        }
        None => "<a class=\"signin\" href=\"/auth/signin\">Sign in</a>".to_string(),
    };

    let cart = if site.cart_api_key.is_some() {
        "<button class=\"snipcart-checkout\">\
         Cart (<span class=\"snipcart-items-count\">0</span>)</button>"
    } else {
        ""
    };

    format!(
        "<header class=\"site-header\"><a class=\"brand\" href=\"/\">{}</a>\
         <nav>{cart}{account}</nav></header>",
        escape(&site.name)
    )
}

fn cart_widget(site: &SiteSettings) -> String {
    match &site.cart_api_key {
        Some(key) => format!(
            "<link rel=\"stylesheet\"{} />\
             <script async{}></script>\
             <div hidden id=\"snipcart\"{}></div>",
            attr("href", CART_CSS),
            attr("src", CART_JS),
            attr("data-api-key", key),
        ),
        None => String::new(),
    }
}

/// Full HTML document around `body`.
pub fn layout(site: &SiteSettings, session: &SessionContext, title: &str, body: &str) -> String {
    let full_title = if title.is_empty() {
        site.name.clone()
    } else {
        format!("{title} | {}", site.name)
    };

    format!(
        "<!DOCTYPE html>\
         <html lang=\"en\"><head><meta charset=\"utf-8\" />\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\
         <title>{}</title></head>\
         <body>{}<main>{body}</main>{}</body></html>",
        escape(&full_title),
        header(site, session),
        cart_widget(site),
    )
}
