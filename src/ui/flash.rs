//! Mensajes flash de la UI
//!
//! Un mensaje viaja en la cookie `garage_flash` a través de una
//! redirección y se consume en la siguiente página renderizada.

use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar};

pub const FLASH_COOKIE: &str = "garage_flash";

/// Redirección con mensaje flash
pub fn redirect_with_flash(to: &str, message: &str) -> impl IntoResponse {
    let cookie = Cookie::build((FLASH_COOKIE, message.to_string()))
        .path("/")
        .http_only(true)
        .build();
    (CookieJar::new().add(cookie), Redirect::to(to))
}

/// Igual que `redirect_with_flash`, conservando otras cookies del jar
pub fn redirect_with_jar(jar: CookieJar, to: &str, message: &str) -> impl IntoResponse {
    let cookie = Cookie::build((FLASH_COOKIE, message.to_string()))
        .path("/")
        .http_only(true)
        .build();
    (jar.add(cookie), Redirect::to(to))
}

/// Lee y borra el mensaje pendiente
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|message| !message.is_empty());

    match message {
        Some(message) => (
            jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build()),
            Some(message),
        ),
        None => (jar, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn test_flash_is_read_once() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("garage_flash=Selected%20mechanic%20is%20not%20available"),
        );
        let jar = CookieJar::from_headers(&headers);

        let (jar, message) = take_flash(jar);
        assert_eq!(message.as_deref(), Some("Selected mechanic is not available"));

        let (_, again) = take_flash(jar);
        assert_eq!(again, None);
    }

    #[test]
    fn test_redirect_sets_flash_cookie() {
        let response = redirect_with_flash("/login", "Please login first").into_response();
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("garage_flash=Please%20login%20first"));
        assert!(!cookie.contains("%25"));
    }

    #[test]
    fn test_flash_survives_redirect() {
        let response =
            redirect_with_flash("/services", "Selected mechanic is not available").into_response();
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        let (_, message) = take_flash(CookieJar::from_headers(&headers));
        assert_eq!(message.as_deref(), Some("Selected mechanic is not available"));
    }
}
