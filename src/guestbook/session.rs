//! `userName` session cookie helpers.

pub const SESSION_COOKIE: &str = "userName";

/// `Set-Cookie` value that expires the session in the browser.
pub const CLEAR_SESSION_COOKIE: &str = "userName=;expires=Thu, 01 Jan 1970 00:00:01 GMT;";

/// The cookie string stored for `name`, also sent as `Set-Cookie`.
pub fn session_cookie(name: &str) -> String {
    format!("{SESSION_COOKIE}={name}")
}

/// User name carried by a raw `Cookie` header: the text between the first
/// and second `=`.
pub fn user_name(cookie: &str) -> Option<&str> {
    cookie.split('=').nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trips_through_cookie() {
        assert_eq!(user_name(&session_cookie("alice")), Some("alice"));
    }

    #[test]
    fn header_without_equals_has_no_name() {
        assert_eq!(user_name("garbage"), None);
        assert_eq!(user_name("userName="), Some(""));
    }
}
