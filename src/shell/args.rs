//! Command argument helpers
//!
//! Every shell command receives the raw rest-of-line after the command
//! word; these helpers slice it up the handful of ways commands need.

/// Split the rest-of-line on whitespace. An empty or all-whitespace rest
/// yields a single empty element so callers can index the first argument
/// unconditionally.
pub fn rest_to_list(rest: &str) -> Vec<String> {
    let items: Vec<String> = rest.split_whitespace().map(String::from).collect();
    if items.is_empty() {
        vec![String::new()]
    } else {
        items
    }
}

/// Optional leading count: if the first token is all digits, parse it as a
/// fetch limit. The rest-of-line is returned untouched either way.
pub fn limit_flag(rest: &str) -> (Option<usize>, &str) {
    let limit = rest
        .split_whitespace()
        .next()
        .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .and_then(|token| token.parse().ok());
    (limit, rest)
}

/// First argument plus an optional trailing count, for commands shaped
/// like `view <user> [limit]`.
pub fn rest_limit(rest: &str) -> (String, Option<usize>) {
    let items = rest_to_list(rest);
    if items.len() == 1 {
        (items[0].clone(), None)
    } else {
        (items[0].clone(), items[items.len() - 1].parse().ok())
    }
}

/// Build the shell prompt from username, an optional browsing context and
/// the profile name.
pub fn update_prompt(username: &str, context: Option<&str>, profile: &str) -> String {
    match context {
        Some(ctx) => format!("[@{username} <{ctx}> ({profile})]: "),
        None => format!("[@{username} ({profile})]: "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_to_list() {
        assert_eq!(rest_to_list("a  b    c"), vec!["a", "b", "c"]);
        assert_eq!(rest_to_list(""), vec![""]);
        assert_eq!(rest_to_list("  "), vec![""]);
        assert_eq!(rest_to_list("abcd"), vec!["abcd"]);
    }

    #[test]
    fn test_limit_flag_with_digits() {
        assert_eq!(limit_flag("123"), (Some(123), "123"));
        assert_eq!(limit_flag("20"), (Some(20), "20"));
    }

    #[test]
    fn test_limit_flag_without_digits() {
        assert_eq!(limit_flag("abc"), (None, "abc"));
        assert_eq!(limit_flag(""), (None, ""));
    }

    #[test]
    fn test_rest_limit_single() {
        assert_eq!(rest_limit("@user"), ("@user".to_string(), None));
    }

    #[test]
    fn test_rest_limit_with_count() {
        assert_eq!(rest_limit("@user 10"), ("@user".to_string(), Some(10)));
    }

    #[test]
    fn test_update_prompt_with_context() {
        assert_eq!(
            update_prompt("test-user", Some("testing"), "test-profile"),
            "[@test-user <testing> (test-profile)]: "
        );
    }

    #[test]
    fn test_update_prompt_without_context() {
        assert_eq!(
            update_prompt("test-user", None, "test-profile"),
            "[@test-user (test-profile)]: "
        );
    }
}
