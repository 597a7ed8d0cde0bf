use std::str::FromStr;

pub(crate) fn var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

pub(crate) fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    var_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
