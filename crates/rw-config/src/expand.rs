//! Environment variable expansion for string config values.

use crate::ConfigError;

/// Expand `$VAR` and `${VAR}` references in `value`.
///
/// `field` names the config key in the error when a variable is unset.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_unchanged() {
        assert_eq!(expand_env("nav.json", "tree.path").unwrap(), "nav.json");
    }

    #[test]
    fn test_expands_set_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RW_NAV_EXPAND_TEST_DIR", "/srv/docs");
        }

        let expanded = expand_env("${RW_NAV_EXPAND_TEST_DIR}/nav.json", "tree.path").unwrap();

        assert_eq!(expanded, "/srv/docs/nav.json");

        unsafe {
            std::env::remove_var("RW_NAV_EXPAND_TEST_DIR");
        }
    }

    #[test]
    fn test_unset_variable_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RW_NAV_EXPAND_TEST_MISSING");
        }

        let err = expand_env("${RW_NAV_EXPAND_TEST_MISSING}/nav.json", "tree.path").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("RW_NAV_EXPAND_TEST_MISSING"));
        assert!(msg.contains("tree.path"));
    }
}
