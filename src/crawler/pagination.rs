//! Catalog page URL construction

use crate::config::SiteConfig;
use crate::ConfigError;
use url::Url;

/// Maps page numbers to catalog URLs
///
/// Page 1 is the base URL itself; later pages resolve the path template
/// against it.
#[derive(Debug, Clone)]
pub struct PageUrls {
    base: Url,
    template: String,
}

impl PageUrls {
    pub fn new(base: Url, template: impl Into<String>) -> Self {
        Self {
            base,
            template: template.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
        Ok(Self::new(base, config.page_path_template.clone()))
    }

    /// URL of `page`, or an error message if the template does not resolve
    pub fn url_for(&self, page: u32) -> Result<Url, String> {
        if page <= 1 {
            return Ok(self.base.clone());
        }

        let path = self.template.replace("{page}", &page.to_string());
        self.base.join(&path).map_err(|e| e.to_string())
    }
}
