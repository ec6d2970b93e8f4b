//! Version information for CareLog

/// The version of CareLog, set at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the application
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Get the full version string with build information
pub fn full_version() -> String {
    format!("{} v{}", APP_NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "carelog");
    }

    #[test]
    fn test_full_version() {
        let full = full_version();
        assert!(full.starts_with("carelog v"));
        assert!(full.contains(VERSION));
    }
}
