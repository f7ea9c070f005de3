//! Line parsing for npmrc templates.
//!
//! The format is a flat INI dialect: no `[section]` headers, keys may start
//! with `@` or `//`, and only the first `=` on a line separates key from
//! value. The parser is deliberately lenient: anything that is not a
//! `key = value` line is kept as a comment so a template survives a
//! load/serialize cycle without losing text.

use crate::config::Entry;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// A `${NAME}` or `${NAME?}` reference with any run of backslashes before it.
static ENV_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<esc>\\*)\$\{(?P<name>[^${}?]+)(?P<mod>\?)?\}").unwrap());

/// Parse npmrc content into ordered entries.
///
/// - Blank lines are dropped.
/// - Lines starting with `;` (after indentation) become comments holding
///   the text after `;`, trailing whitespace included.
/// - Lines containing `=` become properties with trimmed key and value.
/// - Anything else, including a line with an empty key, becomes a comment.
pub fn parse_entries(content: &str) -> Vec<Entry> {
    let mut entries = Vec::new();

    for line in content.lines() {
        // Trailing whitespace belongs to comment text; keys and values are
        // trimmed below.
        let line = line.trim_start();

        if line.is_empty() {
            continue;
        }

        if let Some(text) = line.strip_prefix(';') {
            entries.push(Entry::Comment(text.to_string()));
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => entries.push(Entry::Property {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => entries.push(Entry::Comment(line.to_string())),
        }
    }

    entries
}

/// Expand build variable references in a template value.
///
/// `${NAME}` is replaced by the variable's value and left as written when
/// the build does not define it. `${NAME?}` expands to nothing instead.
/// Backslashes before the `$` pair up: each pair yields one literal
/// backslash, and a leftover one stops the expansion.
pub fn expand_env_vars(value: &str, env: &HashMap<String, String>) -> String {
    ENV_EXPR
        .replace_all(value, |caps: &regex::Captures| {
            let backslashes = caps.name("esc").map_or(0, |m| m.len());
            let name = &caps["name"];
            let optional = caps.name("mod").is_some();
            let mut out = "\\".repeat(backslashes / 2);

            if backslashes % 2 == 1 {
                out.push_str(&format!("${{{}{}}}", name, if optional { "?" } else { "" }));
            } else if let Some(value) = env.get(name) {
                out.push_str(value);
            } else if !optional {
                out.push_str(&format!("${{{}}}", name));
            }

            out
        })
        .into_owned()
}

/// `true` or `false`, ignoring case.
pub fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(key: &str, value: &str) -> Entry {
        Entry::Property {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_simple_ini() {
        let content = r#"
registry = https://registry.npmjs.org/
strict-ssl = true
"#;
        assert_eq!(
            parse_entries(content),
            vec![
                property("registry", "https://registry.npmjs.org/"),
                property("strict-ssl", "true"),
            ]
        );
    }

    #[test]
    fn test_parse_scoped_and_prefixed_keys() {
        let content = r#"
@myorg:registry = https://registry.mycorp.com/
//registry.mycorp.com/:_auth = dXNlcjpwYXNz
"#;
        assert_eq!(
            parse_entries(content),
            vec![
                property("@myorg:registry", "https://registry.mycorp.com/"),
                property("//registry.mycorp.com/:_auth", "dXNlcjpwYXNz"),
            ]
        );
    }

    #[test]
    fn test_parse_comments_keep_text_after_marker() {
        let entries = parse_entries("; leading space kept\n;tight\n");
        assert_eq!(
            entries,
            vec![
                Entry::Comment(" leading space kept".to_string()),
                Entry::Comment("tight".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_comment_keeps_trailing_whitespace() {
        assert_eq!(
            parse_entries("   ; indented note  \nk = v  \n"),
            vec![Entry::Comment(" indented note  ".to_string()), property("k", "v")]
        );
    }

    #[test]
    fn test_parse_comment_with_equals_stays_comment() {
        let entries = parse_entries("; registry = https://old.example.com/");
        assert_eq!(
            entries,
            vec![Entry::Comment(" registry = https://old.example.com/".to_string())]
        );
    }

    #[test]
    fn test_parse_malformed_lines_become_comments() {
        let entries = parse_entries("just some text\n= orphan value\n");
        assert_eq!(
            entries,
            vec![
                Entry::Comment("just some text".to_string()),
                Entry::Comment("= orphan value".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_no_spaces() {
        assert_eq!(
            parse_entries("registry=https://registry.npmjs.org/"),
            vec![property("registry", "https://registry.npmjs.org/")]
        );
    }

    #[test]
    fn test_parse_value_with_equals() {
        assert_eq!(
            parse_entries("key = value=with=equals"),
            vec![property("key", "value=with=equals")]
        );
    }

    #[test]
    fn test_parse_skips_blank_lines_and_crlf() {
        assert_eq!(
            parse_entries("\r\n  \r\na = 1\r\n\r\nb = 2\r\n"),
            vec![property("a", "1"), property("b", "2")]
        );
    }

    #[test]
    fn test_expand_env_vars_from_build_env() {
        let env = env(&[("BUILD_NUMBER", "42")]);

        assert_eq!(expand_env_vars("${BUILD_NUMBER}", &env), "42");
        assert_eq!(expand_env_vars("tag-${BUILD_NUMBER}-rc", &env), "tag-42-rc");
        assert_eq!(expand_env_vars("${MISSING}", &env), "${MISSING}");
        assert_eq!(expand_env_vars("${MISSING?}", &env), "");
    }

    #[test]
    fn test_expand_env_vars_backslashes() {
        let env = env(&[("TOKEN", "abc")]);

        assert_eq!(expand_env_vars("\\${TOKEN}", &env), "${TOKEN}");
        assert_eq!(expand_env_vars("\\\\${TOKEN}", &env), "\\abc");
        assert_eq!(expand_env_vars("\\${TOKEN?}", &env), "${TOKEN?}");
    }

    #[test]
    fn test_parse_bool() {
        for (input, expected) in [
            ("true", Some(true)),
            ("True", Some(true)),
            ("false", Some(false)),
            ("FALSE", Some(false)),
            ("yes", None),
            ("0", None),
            ("", None),
        ] {
            assert_eq!(parse_bool(input), expected, "parse_bool({:?})", input);
        }
    }
}
