//! Placeholder expansion for configuration values.
//!
//! Values may embed `{namespace.key}` placeholders. The global namespaces
//! are `env` (process environment), `system` and `time`; callers can add
//! static values of their own with [`Replacer::set`].

use std::collections::BTreeMap;
use std::fmt;

/// Text substituted for a placeholder that cannot be resolved.
pub const REPLACEMENT_FAILED: &str = "REPLACEMENT_FAILED";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Expands placeholders in configuration values.
pub struct Replacer {
    env: EnvLookup,
    values: BTreeMap<String, String>,
}

impl Replacer {
    /// Creates a replacer backed by the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(|name| std::env::var(name).ok())
    }

    /// Creates a replacer with a custom environment lookup.
    #[must_use]
    pub fn with_env<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            env: Box::new(env),
            values: BTreeMap::new(),
        }
    }

    /// Registers a static placeholder value, overriding the global ones.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Looks up the value of a placeholder key such as `env.HOME`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.values.get(key) {
            return Some(value.clone());
        }
        if let Some(name) = key.strip_prefix("env.") {
            return (self.env)(name);
        }
        match key {
            "system.os" => Some(std::env::consts::OS.to_string()),
            "system.arch" => Some(std::env::consts::ARCH.to_string()),
            "system.slash" => Some(std::path::MAIN_SEPARATOR.to_string()),
            "system.wd" => std::env::current_dir()
                .ok()
                .map(|dir| dir.display().to_string()),
            "time.now.unix" => Some(chrono::Utc::now().timestamp().to_string()),
            "time.now.rfc3339" => Some(chrono::Utc::now().to_rfc3339()),
            _ => None,
        }
    }

    /// Replaces every placeholder in `input`.
    ///
    /// Placeholders that are unknown or resolve to an empty value become
    /// `empty`. `\{` and `\}` produce literal braces, and a `{` without a
    /// closing `}` is kept as-is.
    #[must_use]
    pub fn replace_all(&self, input: &str, empty: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(idx) = rest.find(['{', '\\']) {
            out.push_str(&rest[..idx]);
            let tail = &rest[idx..];

            if let Some(escaped) = tail.strip_prefix('\\') {
                match escaped.chars().next() {
                    Some(c @ ('{' | '}')) => {
                        out.push(c);
                        rest = &escaped[1..];
                    }
                    _ => {
                        out.push('\\');
                        rest = escaped;
                    }
                }
                continue;
            }

            let body = &tail[1..];
            match body.find('}') {
                Some(end) if !body[..end].contains('{') => {
                    let key = &body[..end];
                    match self.get(key).filter(|v| !v.is_empty()) {
                        Some(value) => out.push_str(&value),
                        None => out.push_str(empty),
                    }
                    rest = &body[end + 1..];
                }
                Some(_) => {
                    out.push('{');
                    rest = body;
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Applies [`Replacer::replace_all`] to each value, using
    /// [`REPLACEMENT_FAILED`] for unresolved placeholders.
    #[must_use]
    pub fn replace_values(&self, values: &[String]) -> Vec<String> {
        values
            .iter()
            .map(|v| self.replace_all(v, REPLACEMENT_FAILED))
            .collect()
    }
}

impl Default for Replacer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replacer")
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn replacer() -> Replacer {
        Replacer::with_env(|name| match name {
            "REGION" => Some("us-east-1".to_string()),
            "EMPTY" => Some(String::new()),
            _ => None,
        })
    }

    #[test_case("plain/value", "plain/value" ; "no placeholders")]
    #[test_case("{env.REGION}", "us-east-1" ; "whole value")]
    #[test_case("app/{env.REGION}/token", "app/us-east-1/token" ; "embedded")]
    #[test_case("{env.MISSING}", "REPLACEMENT_FAILED" ; "unset variable")]
    #[test_case("{env.EMPTY}", "REPLACEMENT_FAILED" ; "empty variable")]
    #[test_case("{nope.key}", "REPLACEMENT_FAILED" ; "unknown namespace")]
    #[test_case("a/{env.MISSING}/{env.REGION}", "a/REPLACEMENT_FAILED/us-east-1" ; "mixed")]
    #[test_case(r"\{env.REGION\}", "{env.REGION}" ; "escaped braces")]
    #[test_case("open{env.REGION", "open{env.REGION" ; "unclosed brace")]
    #[test_case("{{env.REGION}", "{us-east-1" ; "nested open brace")]
    #[test_case(r"c:\path", r"c:\path" ; "lone backslash")]
    fn replace_all_with_sentinel(input: &str, expected: &str) {
        assert_eq!(replacer().replace_all(input, REPLACEMENT_FAILED), expected);
    }

    #[test]
    fn static_values_override_globals() {
        let mut repl = replacer();
        repl.set("env.REGION", "eu-west-1");
        repl.set("host.name", "edge-1");
        assert_eq!(
            repl.replace_all("{host.name}/{env.REGION}", ""),
            "edge-1/eu-west-1"
        );
    }

    #[test]
    fn system_placeholders_resolve() {
        let repl = replacer();
        assert_eq!(repl.get("system.os").as_deref(), Some(std::env::consts::OS));
        assert_eq!(
            repl.get("system.slash"),
            Some(std::path::MAIN_SEPARATOR.to_string())
        );
        let unix = repl.get("time.now.unix").expect("time placeholder");
        assert!(unix.parse::<i64>().is_ok());
    }

    #[test]
    fn replace_values_maps_each_token() {
        let values = vec!["{env.REGION}".to_string(), "{env.NOPE}".to_string()];
        assert_eq!(
            replacer().replace_values(&values),
            vec!["us-east-1".to_string(), REPLACEMENT_FAILED.to_string()]
        );
    }
}
