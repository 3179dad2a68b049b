use std::time::Duration;

pub const PRODUCTION_ORIGIN: &str = "https://api.campaigntool.io";
pub const LOCAL_ORIGIN: &str = "http://localhost:5000";

/// Which service origin the binary talks to. Fixed at build time through the
/// `CAMPAIGN_TOOL_ENV` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Local,
}

impl Environment {
    pub fn from_build() -> Self {
        Self::from_flag(option_env!("CAMPAIGN_TOOL_ENV"))
    }

    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(str::trim) {
            Some(flag) if flag.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Local,
        }
    }

    pub fn origin(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_ORIGIN,
            Environment::Local => LOCAL_ORIGIN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Environment::from_build().origin().to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_production_flag_selects_production() {
        assert_eq!(
            Environment::from_flag(Some("production")),
            Environment::Production
        );
        assert_eq!(
            Environment::from_flag(Some(" Production ")),
            Environment::Production
        );
        assert_eq!(Environment::from_flag(Some("staging")), Environment::Local);
        assert_eq!(Environment::from_flag(None), Environment::Local);
        assert_eq!(Environment::Local.origin(), LOCAL_ORIGIN);
    }
}
