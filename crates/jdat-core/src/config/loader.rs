//! Environment variable loading with a single fallback chain.
//!
//! Keeps the `or_else` chains out of business code.

use std::env;
use std::path::Path;

/// Load `.env` from the current directory into the process environment.
/// Variables that are already set are never overwritten. Runs once.
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        load_dotenv_from_dir(&dir);
    });
}

/// Load `<dir>/.env` (not overriding existing variables).
pub fn load_dotenv_from_dir(dir: &Path) {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return;
    };
    for (key, value) in parse_dotenv(&content) {
        if env::var(&key).is_err() {
            #[allow(unsafe_code)]
            unsafe {
                env::set_var(&key, &value);
            }
        }
    }
}

/// Parse `.env` content into key/value pairs.
///
/// Supports `#` comments, surrounding quotes and inline comments on unquoted values.
pub(crate) fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        // Strip inline comment (# not inside quotes)
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            out.push((key.to_string(), value.to_string()));
        }
    }
    out
}

fn lookup(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
}

/// Read the primary variable or the first set alias; empty values fall back to `default`.
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    lookup(primary, aliases)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// Like [`env_or`] but returns `None` when unset or blank.
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    lookup(primary, aliases).and_then(|s| {
        let s = s.trim().to_string();
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    })
}

/// Boolean variable: `0/false/no/off` are false, anything else set is true.
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    match lookup(primary, aliases).as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

/// Comma-separated list; blank entries are dropped. Unset or empty → `default`.
pub fn env_list(primary: &str, aliases: &[&str], default: &[&str]) -> Vec<String> {
    let items: Vec<String> = env_optional(primary, aliases)
        .map(|raw| split_list(&raw))
        .unwrap_or_default();
    if items.is_empty() {
        default.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}

pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotenv_quotes_and_comments() {
        let parsed = parse_dotenv(
            "# header\nJDAT_PYTHON=python3.12\nJDAT_INSTALL_DIR=\"/opt/bin\"\nJDAT_QUIET=1 # quiet\n\nbroken line\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("JDAT_PYTHON".to_string(), "python3.12".to_string()),
                ("JDAT_INSTALL_DIR".to_string(), "/opt/bin".to_string()),
                ("JDAT_QUIET".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(split_list(" cryptography, ,pyinstaller ,"), vec!["cryptography", "pyinstaller"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_env_helpers_fall_back_to_defaults() {
        let key = "JDAT_TEST_LOADER_UNSET_KEY";
        assert_eq!(env_or(key, &[], || "fallback".to_string()), "fallback");
        assert_eq!(env_optional(key, &[]), None);
        assert!(env_bool(key, &[], true));
        assert_eq!(env_list(key, &[], &["a", "b"]), vec!["a", "b"]);
    }
}
