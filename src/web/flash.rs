use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;

const FLASH_COOKIE: &str = "medley_flash";

/// One-shot status message carried across a redirect, read and cleared
/// by the next dashboard render.
#[derive(Debug, Clone, Serialize)]
pub struct Flash {
    pub level: String,
    pub message: String,
}

pub fn set_flash(jar: CookieJar, level: &str, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, format!("{}:{}", level, message)))
        .path("/")
        .http_only(true)
        .build();
    jar.add(cookie)
}

pub fn success(jar: CookieJar, message: &str) -> CookieJar {
    set_flash(jar, "success", message)
}

pub fn error(jar: CookieJar, message: &str) -> CookieJar {
    set_flash(jar, "error", message)
}

pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar.get(FLASH_COOKIE).and_then(|cookie| {
        let raw = cookie.value();
        raw.split_once(':').map(|(level, message)| Flash {
            level: level.to_string(),
            message: message.to_string(),
        })
    });

    let jar = if flash.is_some() {
        jar.remove(Cookie::build(FLASH_COOKIE).path("/").build())
    } else {
        jar
    };

    (jar, flash)
}
