use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Deserialize};

use super::{Id, Resource, haystack};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGrade {
    pub id: Id,
    pub student_name: String,
    #[serde(default)]
    pub nisn: Option<String>,
    pub subject: String,
    pub score: f64,
    #[serde(default)]
    pub kelas: Option<String>,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub struct SubjectGrades;

impl Resource for SubjectGrades {
    type Record = SubjectGrade;

    const PATH: &'static str = "subject-grades";
    const NAME: &'static str = "subject grade";

    fn id(record: &SubjectGrade) -> &Id {
        &record.id
    }

    fn scope_tag(record: &SubjectGrade) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &SubjectGrade) -> &str {
        &record.student_name
    }

    fn search_text(record: &SubjectGrade) -> String {
        haystack([
            Some(record.student_name.as_str()),
            record.nisn.as_deref(),
            Some(record.subject.as_str()),
            record.kelas.as_deref(),
        ])
    }

    fn created(record: &SubjectGrade) -> Option<DateTime<Utc>> {
        record.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graduation {
    pub id: Id,
    pub student_name: String,
    #[serde(default)]
    pub nisn: Option<String>,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// graduation announcements per student
pub struct Graduations;

impl Resource for Graduations {
    type Record = Graduation;

    const PATH: &'static str = "graduation";
    const NAME: &'static str = "graduation";
    const PUBLISH_FIELD: Option<&'static str> = Some("isPublished");

    fn id(record: &Graduation) -> &Id {
        &record.id
    }

    fn scope_tag(record: &Graduation) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &Graduation) -> &str {
        &record.student_name
    }

    fn search_text(record: &Graduation) -> String {
        haystack([
            Some(record.student_name.as_str()),
            record.nisn.as_deref(),
            Some(record.status.as_str()),
        ])
    }

    fn published(record: &Graduation) -> Option<bool> {
        Some(record.is_published)
    }

    fn created(record: &Graduation) -> Option<DateTime<Utc>> {
        record.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub nisn: Option<String>,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub kelas: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// siswa
pub struct Students;

impl Resource for Students {
    type Record = Student;

    const PATH: &'static str = "siswa";
    const NAME: &'static str = "student";

    fn id(record: &Student) -> &Id {
        &record.id
    }

    fn scope_tag(record: &Student) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &Student) -> &str {
        &record.name
    }

    fn search_text(record: &Student) -> String {
        haystack([
            Some(record.name.as_str()),
            record.nisn.as_deref(),
            record.kelas.as_deref(),
        ])
    }

    fn created(record: &Student) -> Option<DateTime<Utc>> {
        record.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub id: Id,
    pub full_name: String,
    #[serde(default)]
    pub jenjang: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// pendaftaran, incoming admission forms
pub struct Admissions;

impl Resource for Admissions {
    type Record = Admission;

    const PATH: &'static str = "pendaftaran";
    const NAME: &'static str = "admission";

    fn id(record: &Admission) -> &Id {
        &record.id
    }

    fn scope_tag(record: &Admission) -> Option<&str> {
        record.jenjang.as_deref()
    }

    fn label(record: &Admission) -> &str {
        &record.full_name
    }

    fn search_text(record: &Admission) -> String {
        haystack([
            Some(record.full_name.as_str()),
            record.parent_name.as_deref(),
            record.email.as_deref(),
            record.phone.as_deref(),
            Some(record.status.as_str()),
        ])
    }

    fn created(record: &Admission) -> Option<DateTime<Utc>> {
        record.created_at
    }
}
