//! One pre-bound client per registered sheet.

use reqwest::Client;
use tracing::{info, instrument};

use super::client::CollectionClient;
use super::error::SheetsError;
use super::record::Sheet;
use super::types::{
    Application, BlogPost, Brochure, CourseOffering, Event, Popup, Subscriber,
};
use crate::config::SiteConfig;

/// Typed clients for every sheet the site uses.
///
/// Built once at startup and shared for the life of the process.
#[derive(Debug, Clone)]
pub struct Collections {
    pub blog: CollectionClient<BlogPost>,
    pub events: CollectionClient<Event>,
    pub brochures: CollectionClient<Brochure>,
    pub subscribers: CollectionClient<Subscriber>,
    pub popups: CollectionClient<Popup>,
    pub applications: CollectionClient<Application>,
    pub course_offerings: CollectionClient<CourseOffering>,
}

impl Collections {
    /// Binds every sheet to the shared HTTP client and backend settings.
    #[must_use]
    pub fn new(http: &Client, config: &SiteConfig) -> Self {
        let sheets = config.sheets.clone();
        Self {
            blog: CollectionClient::new(http.clone(), sheets.clone()),
            events: CollectionClient::new(http.clone(), sheets.clone()),
            brochures: CollectionClient::new(http.clone(), sheets.clone()),
            subscribers: CollectionClient::new(http.clone(), sheets.clone()),
            popups: CollectionClient::new(http.clone(), sheets.clone()),
            applications: CollectionClient::new(http.clone(), sheets.clone()),
            course_offerings: CollectionClient::new(http.clone(), sheets),
        }
    }

    /// Provisions a single sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] when the setup request fails.
    pub async fn setup(&self, sheet: Sheet) -> Result<(), SheetsError> {
        match sheet {
            Sheet::Blog => self.blog.setup().await,
            Sheet::Events => self.events.setup().await,
            Sheet::Brochures => self.brochures.setup().await,
            Sheet::Subscribers => self.subscribers.setup().await,
            Sheet::Popups => self.popups.setup().await,
            Sheet::Applications => self.applications.setup().await,
            Sheet::CourseOfferings => self.course_offerings.setup().await,
        }
    }

    /// Provisions every registered sheet, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`SheetsError`] encountered.
    #[instrument(skip(self))]
    pub async fn setup_all(&self) -> Result<(), SheetsError> {
        for sheet in Sheet::ALL {
            self.setup(sheet).await?;
        }
        info!(sheets = Sheet::ALL.len(), "all sheets provisioned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_binds_each_client_to_its_sheet() {
        let collections = Collections::new(&Client::new(), &SiteConfig::default());
        assert_eq!(collections.blog.sheet(), Sheet::Blog);
        assert_eq!(collections.events.sheet(), Sheet::Events);
        assert_eq!(collections.brochures.sheet(), Sheet::Brochures);
        assert_eq!(collections.subscribers.sheet(), Sheet::Subscribers);
        assert_eq!(collections.popups.sheet(), Sheet::Popups);
        assert_eq!(collections.applications.sheet(), Sheet::Applications);
        assert_eq!(collections.course_offerings.sheet(), Sheet::CourseOfferings);
        assert!(!collections.blog.is_configured());
    }

    #[tokio::test]
    async fn test_setup_all_unconfigured_fails_fast() {
        let collections = Collections::new(&Client::new(), &SiteConfig::default());
        let err = collections.setup_all().await.unwrap_err();
        assert!(matches!(err, SheetsError::NotConfigured { .. }));
    }
}
