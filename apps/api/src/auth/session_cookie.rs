use axum_extra::extract::cookie::{Cookie, SameSite};
use toolgate_domain::SignedToken;

use crate::api_config::CookieSettings;

/// Cookie carrying a freshly minted gateway token.
pub(super) fn issued(settings: &CookieSettings, token: SignedToken) -> Cookie<'static> {
    build(settings, String::from(token))
}

/// Already-expired cookie that overwrites the gateway token on the client.
pub(super) fn cleared(settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = build(settings, String::new());
    cookie.make_removal();
    cookie
}

// Name, path and domain must match between issue and clear or the browser keeps both.
fn build(settings: &CookieSettings, value: String) -> Cookie<'static> {
    let mut builder = Cookie::build((settings.name.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(settings.secure);

    if let Some(domain) = &settings.domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}
