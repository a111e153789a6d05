//! Common data types used by the APIs

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::validate::{Validate, ValidationError};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_type!(
    /// Unique identifier of a course
    CourseId
);
id_type!(
    /// Unique identifier of a section inside a course
    SectionId
);
id_type!(
    /// Unique identifier of a lesson. Unique within its course.
    LessonId
);
id_type!(
    /// Unique identifier of a note
    NoteId
);
id_type!(
    /// Unique identifier of a user account
    UserId
);
id_type!(
    /// Unique identifier of a teacher application
    ApplicationId
);

/// Progress as an integer percentage. Always in the range `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Percent(u8);

impl Percent {
    pub const COMPLETE: Percent = Percent(100);

    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl serde::Serialize for Percent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(percent::Visitor {})
    }
}

mod percent {
    pub struct Visitor {}

    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = super::Percent;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("An integer percentage between 0 and 100")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u8::try_from(v)
                .ok()
                .and_then(super::Percent::new)
                .ok_or_else(|| E::custom(format!("Percentage out of range: {v}")))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v < 0 {
                return Err(E::custom(format!("Percentage out of range: {v}")));
            }
            self.visit_u64(v as u64)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v.fract() != 0.0 || !(0.0..=100.0).contains(&v) {
                return Err(E::custom(format!("Invalid percentage: {v}")));
            }
            self.visit_u64(v as u64)
        }
    }
}

/// Where the video of a lesson comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonSource {
    /// A file uploaded to the backend, referenced by its file name
    Upload(String),
    /// A video hosted elsewhere
    External(String),
}

impl LessonSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Upload(v) | Self::External(v) => v,
        }
    }
}

impl serde::Serialize for LessonSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for LessonSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(lesson_source::Visitor {})
    }
}

mod lesson_source {
    pub struct Visitor {}

    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = super::LessonSource;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("A file name or an http(s) URL")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v.is_empty() {
                return Err(E::custom("Empty lesson source"));
            }
            if v.starts_with("http://") || v.starts_with("https://") {
                Ok(super::LessonSource::External(v.to_string()))
            } else {
                Ok(super::LessonSource::Upload(v.to_string()))
            }
        }
    }
}

/// A single lesson of a course
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(alias = "_id")]
    pub id: LessonId,
    pub title: String,
    /// Human-readable duration label, e.g. "১২:৩০"
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, alias = "videoUrl")]
    pub source: Option<LessonSource>,
}

/// An ordered group of lessons
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(alias = "_id")]
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Course metadata without the syllabus, as listed in the catalog
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    #[serde(alias = "_id")]
    pub id: CourseId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// A course together with its full syllabus
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(alias = "_id")]
    pub id: CourseId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.sections.iter().flat_map(|s| &s.lessons)
    }

    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons().find(|l| l.id == *id)
    }

    pub fn summary(&self) -> CourseSummary {
        CourseSummary {
            id: self.id.clone(),
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            language: self.language.clone(),
            duration: self.duration.clone(),
            price: self.price,
            is_free: self.is_free,
            thumbnail: self.thumbnail.clone(),
        }
    }
}

impl Validate for CourseSummary {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.0.is_empty() {
            return Err(ValidationError::EmptyId("course"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::InvalidPrice(self.price));
        }
        Ok(())
    }
}

impl Validate for Course {
    fn validate(&self) -> Result<(), ValidationError> {
        self.summary().validate()?;

        let mut seen = HashSet::new();
        for section in &self.sections {
            if section.id.0.is_empty() {
                return Err(ValidationError::EmptyId("section"));
            }
            for lesson in &section.lessons {
                if lesson.id.0.is_empty() {
                    return Err(ValidationError::EmptyId("lesson"));
                }
                if !seen.insert(&lesson.id) {
                    return Err(ValidationError::DuplicateLesson(lesson.id.clone()));
                }
            }
        }
        Ok(())
    }
}

/// Links a user to a course
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(alias = "_id")]
    pub id: String,
    pub course: CourseSummary,
    #[serde(default)]
    pub progress: Percent,
    pub enrolled_at: DateTime<Utc>,
}

/// A free-text note attached to a moment of a lesson video
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(alias = "_id")]
    pub id: NoteId,
    #[serde(alias = "lesson")]
    pub lesson_id: LessonId,
    pub title: String,
    pub content: String,
    /// Position in the lesson video, in seconds
    #[serde(default)]
    pub timestamp: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

/// A user account as seen by the frontend
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// A request of a user to become a teacher, reviewed by an admin
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherApplication {
    #[serde(alias = "_id")]
    pub id: ApplicationId,
    pub name: String,
    pub email: String,
    pub expertise: String,
    #[serde(default)]
    pub bio: String,
    pub status: ApplicationStatus,
}

#[cfg(test)]
pub mod test {
    use super::*;
    use googletest::prelude::*;

    fn course_json(second_lesson_id: &str) -> String {
        format!(
            r#"{{
            "_id": "c1",
            "slug": "intro-js",
            "title": "জাভাস্ক্রিপ্ট পরিচিতি",
            "description": "Basics of the language",
            "category": "programming",
            "language": "bn",
            "duration": "3h",
            "price": 0,
            "isFree": true,
            "thumbnail": "uploads/intro-js.png",
            "sections": [
                {{
                    "_id": "s1",
                    "title": "Basics",
                    "lessons": [
                        {{ "_id": "L1", "title": "Welcome", "duration": "05:00", "videoUrl": "welcome.mp4" }},
                        {{ "_id": "{second_lesson_id}", "title": "Variables", "videoUrl": "https://cdn.example.com/L2.m3u8" }}
                    ]
                }}
            ]
        }}"#
        )
    }

    #[googletest::gtest]
    fn deserialize_course() -> googletest::Result<()> {
        let course: Course = serde_json::from_str(&course_json("L2")).or_fail()?;

        expect_that!(course.id, eq(&CourseId::from("c1")));
        expect_that!(course.slug, eq("intro-js"));
        expect_true!(course.is_free);
        expect_that!(course.sections.len(), eq(1));
        expect_that!(
            course.sections[0].lessons[0].source,
            some(eq(&LessonSource::Upload("welcome.mp4".to_string())))
        );
        expect_that!(
            course.sections[0].lessons[1].source,
            some(eq(&LessonSource::External(
                "https://cdn.example.com/L2.m3u8".to_string()
            )))
        );
        expect_that!(course.validate(), ok(anything()));
        Ok(())
    }

    #[googletest::gtest]
    fn duplicate_lesson_ids_are_rejected() -> googletest::Result<()> {
        let course: Course = serde_json::from_str(&course_json("L1")).or_fail()?;
        expect_that!(
            course.validate(),
            err(eq(&ValidationError::DuplicateLesson(LessonId::from("L1"))))
        );
        Ok(())
    }

    #[googletest::gtest]
    fn deserialize_percent() -> googletest::Result<()> {
        expect_that!(serde_json::from_str::<Percent>("0").or_fail()?, eq(Percent(0)));
        expect_that!(serde_json::from_str::<Percent>("100").or_fail()?, eq(Percent(100)));
        expect_that!(serde_json::from_str::<Percent>("40.0").or_fail()?, eq(Percent(40)));
        Ok(())
    }

    #[googletest::gtest]
    fn deserialize_percent_out_of_range() -> googletest::Result<()> {
        for testcase in ["101", "-1", "33.5", "\"50\"", "1000"] {
            expect_that!(serde_json::from_str::<Percent>(testcase), err(anything()));
        }
        Ok(())
    }

    #[googletest::gtest]
    fn deserialize_note() -> googletest::Result<()> {
        let note: Note = serde_json::from_str(
            r#"{
                "_id": "n1",
                "lesson": "L1",
                "title": "Closures",
                "content": "Revisit at the end",
                "timestamp": 125,
                "createdAt": "2025-03-01T10:15:00Z"
            }"#,
        )
        .or_fail()?;
        expect_that!(note.id, eq(&NoteId::from("n1")));
        expect_that!(note.lesson_id, eq(&LessonId::from("L1")));
        expect_that!(note.timestamp, eq(125));
        Ok(())
    }

    #[googletest::gtest]
    fn deserialize_teacher_application() -> googletest::Result<()> {
        let application: TeacherApplication = serde_json::from_str(
            r#"{
                "id": "a1",
                "name": "Rahim",
                "email": "rahim@example.com",
                "expertise": "Mathematics",
                "status": "pending"
            }"#,
        )
        .or_fail()?;
        expect_that!(application.status, eq(ApplicationStatus::Pending));
        expect_that!(application.bio, eq(""));
        Ok(())
    }
}
