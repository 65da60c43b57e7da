// flowcollect-config/src/validation.rs
//! Custom validation functions for configuration.

use validator::ValidationError;

/// Validate that an interface name follows Linux naming conventions
/// (at most 15 bytes, `IFNAMSIZ - 1`).
pub fn validate_interface(name: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^[a-zA-Z0-9_.@-]{1,15}$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;

    if re.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_interface"))
    }
}

/// Validate a comma-separated list of `target=level` or `level` directives.
pub fn validate_log_filter(filter: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new(
        r"^([A-Za-z0-9_:\-]+=)?(trace|debug|info|warn|error|off)$",
    )
    .map_err(|_| ValidationError::new("invalid_regex"))?;

    let valid = !filter.trim().is_empty()
        && filter
            .split(',')
            .all(|directive| re.is_match(directive.trim()));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_filter"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_names() {
        assert!(validate_interface("eth0").is_ok());
        assert!(validate_interface("veth1a2b@if3").is_ok());
        assert!(validate_interface("br-int").is_ok());
        assert!(validate_interface("").is_err());
        assert!(validate_interface("sixteen_chars_xx").is_err());
        assert!(validate_interface("eth 0").is_err());
    }

    #[test]
    fn log_filters() {
        assert!(validate_log_filter("info").is_ok());
        assert!(validate_log_filter("warn,flowcollect_flow=trace").is_ok());
        assert!(validate_log_filter("").is_err());
        assert!(validate_log_filter("loud").is_err());
    }
}
