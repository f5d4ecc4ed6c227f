use std::env;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Reads the environment variable `name` as a boolean flag. Unset or unrecognised values give `default`.
pub fn env_flag(name: &str, default: bool) -> bool {
    parse_boolean_flag(env::var(name).ok(), default)
}

/// Reads the environment variable `name`, treating blank values as unset.
pub fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
