//! URL paths of every page, in one place so handlers, views and tests agree.

pub const HOME: &str = "/";
pub const SIGNUP: &str = "/auth/signup/";
pub const LOGIN: &str = "/auth/login/";
pub const LOGOUT: &str = "/auth/logout/";
pub const NOTES_LIST: &str = "/notes/";
pub const NOTE_ADD: &str = "/add/";
pub const SUCCESS: &str = "/done/";
pub const HEALTH: &str = "/health";

/// Route patterns with a `{slug}` capture; the builders below fill them in.
pub const NOTE_DETAIL_ROUTE: &str = "/note/{slug}/";
pub const NOTE_EDIT_ROUTE: &str = "/edit/{slug}/";
pub const NOTE_DELETE_ROUTE: &str = "/delete/{slug}/";

fn with_slug(route: &str, slug: &str) -> String {
    route.replace("{slug}", slug)
}

pub fn note_detail(slug: &str) -> String {
    with_slug(NOTE_DETAIL_ROUTE, slug)
}

pub fn note_edit(slug: &str) -> String {
    with_slug(NOTE_EDIT_ROUTE, slug)
}

pub fn note_delete(slug: &str) -> String {
    with_slug(NOTE_DELETE_ROUTE, slug)
}

/// Login page that returns to `next` afterwards.
///
/// `next` is percent-encoded except for `/`, so `/notes/` stays readable.
pub fn login_with_next(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{LOGIN}?next={}", encoded.replace("%2F", "/"))
}

/// Whether `next` is a local path that is safe to redirect to after login.
///
/// Rejects absolute and protocol-relative URLs (`//host`), backslashes,
/// which some browsers treat as `/`, and control or whitespace characters,
/// which browsers strip before resolving (`/\t/host` is `//host`).
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next
            .chars()
            .any(|c| c == '\\' || c.is_control() || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_paths() {
        assert_eq!(note_detail("zagolovok"), "/note/zagolovok/");
        assert_eq!(note_edit("zagolovok"), "/edit/zagolovok/");
        assert_eq!(note_delete("zagolovok"), "/delete/zagolovok/");
    }

    #[test]
    fn next_keeps_slashes_and_encodes_the_rest() {
        assert_eq!(login_with_next("/notes/"), "/auth/login/?next=/notes/");
        assert_eq!(
            login_with_next("/add/?a=1&b=2"),
            "/auth/login/?next=/add/%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn safe_next_rejects_offsite_targets() {
        assert!(is_safe_next("/notes/"));
        assert!(!is_safe_next("//evil.example/"));
        assert!(!is_safe_next("https://evil.example/"));
        assert!(!is_safe_next("/\\evil.example"));
        assert!(!is_safe_next(""));
    }

    #[test]
    fn safe_next_rejects_control_and_whitespace() {
        assert!(!is_safe_next("/\t/evil.example/"));
        assert!(!is_safe_next("/\r\n/evil.example/"));
        assert!(!is_safe_next("/notes/\n"));
        assert!(!is_safe_next("/ /evil.example/"));
        assert!(!is_safe_next("/notes/\u{0}"));
        assert!(is_safe_next("/add/?a=1&b=2"));
    }

    #[test]
    fn route_patterns_match_builders() {
        assert_eq!(note_detail("{slug}"), NOTE_DETAIL_ROUTE);
        assert_eq!(note_edit("{slug}"), NOTE_EDIT_ROUTE);
        assert_eq!(note_delete("{slug}"), NOTE_DELETE_ROUTE);
    }
}
