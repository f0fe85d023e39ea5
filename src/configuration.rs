use std::time::Duration;

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use url::Url;

use crate::domain::AdvancePolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub webdriver: WebDriverSettings,
    pub search: SearchSettings,
    pub scraping: ScrapingSettings,
    pub selectors: SelectorSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub output_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebDriverSettings {
    pub server_url: String,
    pub headless: bool,
    pub maximize_window: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub start_url: String,
    pub search_term: String,
    pub search_input_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingSettings {
    pub advance_policy: AdvancePolicy,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub search_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_interval_millis: u64,
}

impl ScrapingSettings {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }
}

/// CSS selectors for the search results page. Field selectors are scoped to a card.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorSettings {
    pub card: String,
    /// Matches a card or the zero-results marker.
    pub results_ready: String,
    pub next_page: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub link_attribute: String,
}

impl Settings {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.scraping.search_timeout_secs == 0 || self.scraping.page_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "scraping timeouts must be at least one second".to_string(),
            ));
        }
        if let AdvancePolicy::MaxPages { limit: 0 } = self.scraping.advance_policy {
            return Err(config::ConfigError::Message(
                "max_pages limit must be at least 1".to_string(),
            ));
        }
        if let Err(e) = Url::parse(&self.search.start_url) {
            return Err(config::ConfigError::Message(format!(
                "search.start_url `{}` is not an absolute url: {}",
                self.search.start_url, e
            )));
        }
        Ok(())
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
