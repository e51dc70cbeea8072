use crate::config::types::Options;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses an options file from the given path
///
/// Keys are kebab-case and every key is optional; missing keys keep their
/// default value.
///
/// # Arguments
///
/// * `path` - Path to the TOML options file
///
/// # Returns
///
/// * `Ok(Options)` - Successfully loaded and validated options
/// * `Err(ConfigError)` - Failed to load, parse, or validate the options
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sigrawler::config::load_options;
///
/// let options = load_options(Path::new("sigrawler.toml")).unwrap();
/// println!("Depth: {}", options.depth);
/// ```
pub fn load_options(path: &Path) -> Result<Options, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

/// Parses and validates options from TOML text
pub fn parse_options(content: &str) -> Result<Options, ConfigError> {
    let options: Options = toml::from_str(content)?;

    validate(&options)?;

    Ok(options)
}

/// Splits a comma-separated proxy list, dropping blank entries
///
/// # Example
///
/// ```
/// use sigrawler::config::split_proxies;
///
/// let proxies = split_proxies("http://a:8080, ,http://b:8080");
/// assert_eq!(proxies, vec!["http://a:8080", "http://b:8080"]);
/// ```
pub fn split_proxies(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
