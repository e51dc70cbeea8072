use crate::config::types::Options;
use crate::ConfigError;
use url::Url;

/// Schemes accepted for outbound proxies
const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Validates the entire option set
pub fn validate(options: &Options) -> Result<(), ConfigError> {
    validate_limits(options)?;
    validate_user_agent(options.user_agent.as_deref())?;
    validate_proxies(&options.proxies)?;
    Ok(())
}

/// Validates concurrency, timeout and session limits
fn validate_limits(options: &Options) -> Result<(), ConfigError> {
    if options.concurrency < 1 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be >= 1, got {}",
            options.concurrency
        )));
    }

    if options.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            options.timeout
        )));
    }

    if options.max_sessions < 1 {
        return Err(ConfigError::Validation(format!(
            "max_sessions must be >= 1, got {}",
            options.max_sessions
        )));
    }

    Ok(())
}

/// Validates an explicit User-Agent override
fn validate_user_agent(user_agent: Option<&str>) -> Result<(), ConfigError> {
    match user_agent {
        Some(agent) if agent.trim().is_empty() => Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        )),
        Some(agent) if agent.chars().any(|c| c.is_control()) => Err(ConfigError::Validation(
            "user_agent cannot contain control characters".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Validates that every proxy is an absolute URL with a supported scheme
fn validate_proxies(proxies: &[String]) -> Result<(), ConfigError> {
    for proxy in proxies {
        let url = Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidProxy(format!("'{}': {}", proxy, e)))?;

        if !PROXY_SCHEMES.contains(&url.scheme()) {
            return Err(ConfigError::InvalidProxy(format!(
                "'{}': unsupported scheme '{}'",
                proxy,
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidProxy(format!("'{}': missing host", proxy)));
        }
    }

    Ok(())
}
