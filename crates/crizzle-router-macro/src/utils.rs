/// `NotFound` -> `not_found`, `Backtesting` -> `backtesting`.
pub(crate) fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_upper = false;

    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !prev_upper {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_upper = true;
        } else {
            result.push(c);
            prev_upper = false;
        }
    }

    result
}

/// `NotFound` -> `Not Found`.
pub(crate) fn to_title_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_upper = true;

    for c in s.chars() {
        if c.is_uppercase() && !prev_upper {
            result.push(' ');
        }
        prev_upper = c.is_uppercase();
        result.push(c);
    }

    result
}

/// Static paths only: leading slash, no parameters, wildcards, query or
/// fragment, and no trailing slash except for the root.
pub(crate) fn static_path_problem(path: &str) -> Option<&'static str> {
    if !path.starts_with('/') {
        return Some("route paths must start with `/`");
    }
    if path.contains(':') || path.contains('*') {
        return Some("route paths must be static; parameters and wildcards are not supported");
    }
    if path.contains('?') || path.contains('#') {
        return Some("route paths cannot carry a query or fragment");
    }
    if path.len() > 1 && path.ends_with('/') {
        return Some("route paths cannot end with `/`");
    }
    None
}
