use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Deserialize};

use super::{Id, Resource, haystack};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// pengumuman
pub struct Announcements;

impl Resource for Announcements {
    type Record = Announcement;

    const PATH: &'static str = "pengumuman";
    const NAME: &'static str = "announcement";
    const PUBLISH_FIELD: Option<&'static str> = Some("isPublished");

    fn id(record: &Announcement) -> &Id {
        &record.id
    }

    fn scope_tag(record: &Announcement) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &Announcement) -> &str {
        &record.title
    }

    fn search_text(record: &Announcement) -> String {
        haystack([
            Some(record.title.as_str()),
            Some(record.content.as_str()),
            record.author.as_deref(),
        ])
    }

    fn published(record: &Announcement) -> Option<bool> {
        Some(record.is_published)
    }

    fn created(record: &Announcement) -> Option<DateTime<Utc>> {
        record.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub achieved_at: Option<NaiveDate>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// berita, the achievements feed
pub struct Achievements;

impl Resource for Achievements {
    type Record = Achievement;

    const PATH: &'static str = "berita";
    const NAME: &'static str = "achievement";
    const PUBLISH_FIELD: Option<&'static str> = Some("isPublished");

    fn id(record: &Achievement) -> &Id {
        &record.id
    }

    fn scope_tag(record: &Achievement) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &Achievement) -> &str {
        &record.title
    }

    fn search_text(record: &Achievement) -> String {
        haystack([
            Some(record.title.as_str()),
            Some(record.content.as_str()),
            record.author.as_deref(),
        ])
    }

    fn published(record: &Achievement) -> Option<bool> {
        Some(record.is_published)
    }

    fn created(record: &Achievement) -> Option<DateTime<Utc>> {
        record.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// kegiatan
pub struct Activities;

impl Resource for Activities {
    type Record = Activity;

    const PATH: &'static str = "kegiatan";
    const NAME: &'static str = "activity";
    const PUBLISH_FIELD: Option<&'static str> = Some("isPublished");

    fn id(record: &Activity) -> &Id {
        &record.id
    }

    fn scope_tag(record: &Activity) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &Activity) -> &str {
        &record.title
    }

    fn search_text(record: &Activity) -> String {
        haystack([
            Some(record.title.as_str()),
            Some(record.description.as_str()),
            record.location.as_deref(),
        ])
    }

    fn published(record: &Activity) -> Option<bool> {
        Some(record.is_published)
    }

    fn created(record: &Activity) -> Option<DateTime<Utc>> {
        record.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carousel {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub struct Carousels;

impl Resource for Carousels {
    type Record = Carousel;

    const PATH: &'static str = "carousels";
    const NAME: &'static str = "carousel";
    const PUBLISH_FIELD: Option<&'static str> = Some("isActive");

    fn id(record: &Carousel) -> &Id {
        &record.id
    }

    fn scope_tag(record: &Carousel) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &Carousel) -> &str {
        &record.title
    }

    fn search_text(record: &Carousel) -> String {
        haystack([Some(record.title.as_str()), record.subtitle.as_deref()])
    }

    fn published(record: &Carousel) -> Option<bool> {
        Some(record.is_active)
    }

    fn created(record: &Carousel) -> Option<DateTime<Utc>> {
        record.created_at
    }
}
