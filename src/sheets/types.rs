//! Record types stored in the site's sheets.
//!
//! Status fields are plain data: any update may set any status. Timestamps
//! are ISO-8601 strings exactly as the sheet stores them.

use serde::{Deserialize, Serialize};

use super::cells::{blank_as_default, blank_as_none, lenient_i64, string_or_number};
use super::record::{RecordData, Sheet};

/// Publication state of blog posts and events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Visibility of brochures, popups, and course offerings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Active,
    #[default]
    Draft,
}

/// Newsletter subscription state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    #[default]
    Active,
    Unsubscribed,
}

/// Review state of a submitted application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    New,
    Reviewed,
    Contacted,
    Rejected,
}

/// A blog article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(deserialize_with = "string_or_number")]
    pub title: String,
    #[serde(deserialize_with = "string_or_number")]
    pub slug: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub content: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub status: PostStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub updated_at: Option<String>,
}

impl RecordData for BlogPost {
    const SHEET: Sheet = Sheet::Blog;
}

/// A scheduled event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(deserialize_with = "string_or_number")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub description: String,
    /// Event start, ISO-8601.
    #[serde(deserialize_with = "string_or_number")]
    pub date: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub registration_url: Option<String>,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub status: PostStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub updated_at: Option<String>,
}

impl RecordData for Event {
    const SHEET: Sheet = Sheet::Events;
}

/// A downloadable brochure. `file_url` points at the media host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brochure {
    #[serde(deserialize_with = "string_or_number")]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub file_url: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub status: ContentStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub updated_at: Option<String>,
}

impl RecordData for Brochure {
    const SHEET: Sheet = Sheet::Brochures;
}

/// A newsletter subscriber.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(deserialize_with = "string_or_number")]
    pub email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub status: SubscriberStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subscribed_at: Option<String>,
}

impl RecordData for Subscriber {
    const SHEET: Sheet = Sheet::Subscribers;
}

/// A promotional popup shown on the site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    #[serde(deserialize_with = "string_or_number")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub message: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cta_text: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cta_url: Option<String>,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub status: ContentStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub updated_at: Option<String>,
}

impl RecordData for Popup {
    const SHEET: Sheet = Sheet::Popups;
}

/// An application submitted through the enquiry form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub status: ApplicationStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub submitted_at: Option<String>,
}

impl RecordData for Application {
    const SHEET: Sheet = Sheet::Applications;
}

/// A course listed on the site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOffering {
    #[serde(deserialize_with = "string_or_number")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub description: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub fee: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub status: ContentStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub updated_at: Option<String>,
}

impl RecordData for CourseOffering {
    const SHEET: Sheet = Sheet::CourseOfferings;
}
