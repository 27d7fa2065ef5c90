use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;

mod content;
mod academic;
mod school;

pub use content::{
    Announcements, Announcement,
    Achievements, Achievement,
    Activities, Activity,
    Carousels, Carousel,
};
pub use academic::{
    SubjectGrades, SubjectGrade,
    Graduations, Graduation,
    Students, Student,
    Admissions, Admission,
};
pub use school::{
    Levels, LevelRecord,
    SocialMedias, SocialMedia,
};

/// record ids come back as integers from some tables and strings from others.
/// two ids are the same when they render to the same text, so `42` and
/// `"42"` name one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Id::Int(a), Id::Int(b)) => a == b,
            (Id::Str(a), Id::Str(b)) => a == b,
            (Id::Int(i), Id::Str(s)) | (Id::Str(s), Id::Int(i)) => i.to_string() == *s,
        }
    }
}

impl Eq for Id {}

impl std::hash::Hash for Id {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Id::Int(v) => v.to_string().hash(state),
            Id::Str(v) => v.hash(state),
        }
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Id::Int(v) => write!(f, "{}", v),
            Id::Str(v) => f.write_str(v),
        }
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(v) => Id::Int(v),
            Err(_) => Id::Str(s.to_owned()),
        })
    }
}

impl From<i64> for Id {
    fn from(v: i64) -> Self {
        Id::Int(v)
    }
}

impl From<&str> for Id {
    fn from(v: &str) -> Self {
        Id::Str(v.to_owned())
    }
}

impl From<String> for Id {
    fn from(v: String) -> Self {
        Id::Str(v)
    }
}

/// what the list editor needs to know about one backend collection
pub trait Resource: Send + Sync + 'static {
    type Record: DeserializeOwned + Serialize + Clone + std::fmt::Debug + Send + Sync + 'static;

    /// collection path relative to the api base
    const PATH: &'static str;

    /// human name used in notifications and output
    const NAME: &'static str;

    /// body field holding the level tag, `None` for collections shared by
    /// every level
    const TAG_FIELD: Option<&'static str> = Some("jenjang");

    /// body field toggled by the publish action, `None` when the
    /// collection has no publish state
    const PUBLISH_FIELD: Option<&'static str> = None;

    fn id(record: &Self::Record) -> &Id;

    fn scope_tag(record: &Self::Record) -> Option<&str>;

    /// title or name shown for the record
    fn label(record: &Self::Record) -> &str;

    fn search_text(record: &Self::Record) -> String {
        Self::label(record).to_lowercase()
    }

    fn published(_record: &Self::Record) -> Option<bool> {
        None
    }

    fn created(_record: &Self::Record) -> Option<DateTime<Utc>> {
        None
    }

    fn item_path(id: &Id) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}

/// joins the present parts into one lowercase haystack for searching
pub(crate) fn haystack<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>
{
    let mut rtn = String::new();

    for part in parts.into_iter().flatten() {
        if !rtn.is_empty() {
            rtn.push(' ');
        }

        rtn.push_str(&part.to_lowercase());
    }

    rtn
}
