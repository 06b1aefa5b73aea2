//! Request handlers organized by domain.

pub mod health;
pub mod inbox;
pub mod notice_types;
pub mod observations;
pub mod send;
pub mod settings;
pub mod unsubscribe;
pub mod users;

use axum::response::Redirect;

use notice_service::is_local_path;

/// 303 to `next_page` when it stays on this site, else to `fallback`.
pub(crate) fn redirect_to(next_page: Option<&str>, fallback: &str) -> Redirect {
    match next_page.filter(|p| is_local_path(p)) {
        Some(path) => Redirect::to(path),
        None => Redirect::to(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::http::header::LOCATION;
    use axum::response::IntoResponse;

    fn location(redirect: Redirect) -> String {
        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        response.headers()[LOCATION].to_str().unwrap().to_string()
    }

    #[test]
    fn test_redirect_to_local_next_page() {
        assert_eq!(location(redirect_to(Some("/posts/1/"), "/notices")), "/posts/1/");
    }

    #[test]
    fn test_redirect_to_rejects_offsite_targets() {
        assert_eq!(location(redirect_to(Some("https://evil.test/"), "/notices")), "/notices");
        assert_eq!(location(redirect_to(Some("//evil.test/"), "/notices")), "/notices");
        assert_eq!(location(redirect_to(None, "/notices")), "/notices");
    }
}
