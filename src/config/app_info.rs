//! Identity of the application embedding this library.
//!
//! Platforms ask integrators to advertise themselves in the `User-Agent`
//! so that support can correlate traffic with a specific integration.

use std::fmt;

/// Name, version, and URL of the host application.
///
/// Rendered as `name/version (url)`, omitting missing parts.
///
/// # Example
///
/// ```rust
/// use telephony_api::AppInfo;
///
/// let info = AppInfo::new("CallCenter").version("2.1.0").url("https://cc.example.com");
/// assert_eq!(info.to_string(), "CallCenter/2.1.0 (https://cc.example.com)");
///
/// assert_eq!(AppInfo::new("Bare").to_string(), "Bare");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInfo {
    name: String,
    version: Option<String>,
    url: Option<String>,
}

impl AppInfo {
    /// Creates app info with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            url: None,
        }
    }

    /// Sets the application version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the application URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns the application name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(version) = &self.version {
            write!(f, "/{version}")?;
        }
        if let Some(url) = &self.url {
            write!(f, " ({url})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_info_display_with_version_only() {
        let info = AppInfo::new("Dialer").version("1.0");
        assert_eq!(info.to_string(), "Dialer/1.0");
    }

    #[test]
    fn test_app_info_display_with_url_only() {
        let info = AppInfo::new("Dialer").url("https://dialer.example.com");
        assert_eq!(info.to_string(), "Dialer (https://dialer.example.com)");
        assert_eq!(info.name(), "Dialer");
    }
}
