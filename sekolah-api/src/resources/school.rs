use serde::{Serialize, Deserialize};

use super::{Id, Resource, haystack};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRecord {
    pub id: Id,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// jenjang, the levels themselves. the level code doubles as the scope tag
pub struct Levels;

impl Resource for Levels {
    type Record = LevelRecord;

    const PATH: &'static str = "jenjang";
    const NAME: &'static str = "level";
    const TAG_FIELD: Option<&'static str> = Some("code");

    fn id(record: &LevelRecord) -> &Id {
        &record.id
    }

    fn scope_tag(record: &LevelRecord) -> Option<&str> {
        Some(&record.code)
    }

    fn label(record: &LevelRecord) -> &str {
        &record.name
    }

    fn search_text(record: &LevelRecord) -> String {
        haystack([
            Some(record.name.as_str()),
            Some(record.code.as_str()),
            record.description.as_deref(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    pub id: Id,
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

pub struct SocialMedias;

impl Resource for SocialMedias {
    type Record = SocialMedia;

    const PATH: &'static str = "social-media";
    const NAME: &'static str = "social media link";
    const PUBLISH_FIELD: Option<&'static str> = Some("isActive");

    fn id(record: &SocialMedia) -> &Id {
        &record.id
    }

    fn scope_tag(record: &SocialMedia) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &SocialMedia) -> &str {
        &record.platform
    }

    fn search_text(record: &SocialMedia) -> String {
        haystack([Some(record.platform.as_str()), Some(record.url.as_str())])
    }

    fn published(record: &SocialMedia) -> Option<bool> {
        Some(record.is_active)
    }
}
