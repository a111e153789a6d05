//! The `shikkha-api` crate defines the data types exchanged between `shikkha-site` and the
//! Shikkha REST backend.
//!
//! The crate follows these conventions:
//! - Each API endpoint of the backend defines a full namespace path.
//! - For each endpoint namespace, `shikkha-api` defines a nested namespace
//!   with the API method of the endpoint.
//! - Inside the namespace for a given API endpoint, the following types are defined:
//!   - A `path` function building the request path from its parameters.
//!   - If the endpoint takes a JSON body, a `Request` type defines its contents.
//!   - If the endpoint returns a JSON body, a `Response` type defines its contents.
//! - Every response is wrapped in an envelope carrying `success` and an optional `message`
//!   (see [`Ack`]). Response types only describe the payload next to those fields.
//!
//! The supported endpoints are:
//!  - `GET` `api/courses`. Lists the course catalog.
//!  - `GET` `api/courses/{slug}`. Returns a course together with its syllabus.
//!  - `DELETE` `api/courses/{id}`. Removes a course (admin).
//!  - `POST` `api/courses/{id}/enroll`. Enrolls the current user into a course.
//!  - `GET` `api/courses/enrolled/me`. Lists the enrollments of the current user.
//!  - `POST` `api/courses/get-video-url`. Resolves a lesson into a temporary playback URL.
//!  - `GET` `api/progress/lesson/{lessonId}`. Returns the completion state of a lesson.
//!  - `POST` `api/progress/lesson/complete`. Marks a lesson as completed.
//!  - `GET` `api/notes/lesson/{lessonId}`. Lists the notes of a lesson.
//!  - `POST` `api/notes/create`. Creates a note.
//!  - `DELETE` `api/notes/{noteId}`. Deletes a note.
//!  - `POST` `api/auth/login`. Exchanges credentials for a bearer token.
//!  - `POST` `api/teachers/apply`. Submits a teacher application.
//!  - `GET` `api/admin/teachers`. Lists teacher applications (admin).
//!  - `PUT` `api/admin/teachers/{id}/{approve|reject}`. Reviews a teacher application (admin).
//!  - `GET` `api/admin/users`. Lists users (admin).
//!  - `DELETE` `api/admin/users/{id}`. Removes a user (admin).

mod types;
mod validate;

pub use types::{
    ApplicationId, ApplicationStatus, Course, CourseId, CourseSummary, Enrollment, Lesson,
    LessonId, LessonSource, Note, NoteId, Percent, Role, Section, SectionId, TeacherApplication,
    User, UserId,
};
pub use validate::{Validate, ValidationError};

/// Percent-encodes a value placed in a single path segment.
fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

/// The envelope fields present in every backend response
#[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of endpoints that return nothing beyond the envelope
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, PartialEq)]
pub struct Empty {}

impl Validate for Empty {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

pub mod api {
    pub mod auth {
        pub mod login {
            pub mod post {
                use crate::{User, Validate, ValidationError};

                pub fn path() -> String {
                    "/api/auth/login".to_string()
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
                pub struct Request {
                    pub email: String,
                    pub password: String,
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub token: String,
                    pub user: User,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        if self.token.trim().is_empty() {
                            return Err(ValidationError::EmptyToken);
                        }
                        Ok(())
                    }
                }
            }
        }
    }

    pub mod courses {
        pub mod get {
            use crate::{CourseSummary, Validate, ValidationError};

            pub fn path() -> String {
                "/api/courses".to_string()
            }

            /// The response to the `GET` `api/courses` request
            #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
            pub struct Response {
                pub courses: Vec<CourseSummary>,
            }

            impl Validate for Response {
                fn validate(&self) -> Result<(), ValidationError> {
                    self.courses.validate()
                }
            }
        }

        pub mod slug {
            pub mod get {
                use crate::{Course, Validate, ValidationError};

                pub fn path(slug: &str) -> String {
                    format!("/api/courses/{}", crate::segment(slug))
                }

                /// The response to the `GET` `api/courses/{slug}` request
                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub course: Course,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        self.course.validate()
                    }
                }
            }
        }

        pub mod id {
            pub mod delete {
                use crate::CourseId;

                pub fn path(id: &CourseId) -> String {
                    format!("/api/courses/{}", crate::segment(id.as_str()))
                }

                pub type Response = crate::Empty;
            }
        }

        pub mod enroll {
            pub mod post {
                use crate::{CourseId, Enrollment, Validate, ValidationError};

                pub fn path(id: &CourseId) -> String {
                    format!("/api/courses/{}/enroll", crate::segment(id.as_str()))
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub enrollment: Enrollment,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        self.enrollment.course.validate()
                    }
                }
            }
        }

        pub mod enrolled {
            pub mod get {
                use crate::{Enrollment, Validate, ValidationError};

                pub fn path() -> String {
                    "/api/courses/enrolled/me".to_string()
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub enrollments: Vec<Enrollment>,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        self.enrollments
                            .iter()
                            .try_for_each(|e| e.course.validate())
                    }
                }
            }
        }

        pub mod video_url {
            pub mod post {
                use crate::{LessonId, Validate, ValidationError};

                pub fn path() -> String {
                    "/api/courses/get-video-url".to_string()
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
                #[serde(rename_all = "camelCase")]
                pub struct Request {
                    pub lesson_id: LessonId,
                }

                /// The response to the `POST` `api/courses/get-video-url` request. The URL is
                /// temporary and points to an HLS manifest.
                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
                #[serde(rename_all = "camelCase")]
                pub struct Response {
                    pub playback_url: String,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        if self.playback_url.trim().is_empty() {
                            return Err(ValidationError::EmptyPlaybackUrl);
                        }
                        Ok(())
                    }
                }
            }
        }
    }

    pub mod progress {
        pub mod lesson {
            pub mod get {
                use crate::{LessonId, Validate, ValidationError};

                pub fn path(lesson: &LessonId) -> String {
                    format!("/api/progress/lesson/{}", crate::segment(lesson.as_str()))
                }

                /// The response to the `GET` `api/progress/lesson/{lessonId}` request
                #[derive(Debug, Default, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
                #[serde(rename_all = "camelCase")]
                pub struct Response {
                    #[serde(default)]
                    pub completed: bool,
                    /// Last reported playback position in seconds
                    #[serde(default)]
                    pub watch_time: Option<u32>,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        Ok(())
                    }
                }
            }
        }

        pub mod complete {
            pub mod post {
                use crate::{CourseId, LessonId, Percent, Validate, ValidationError};

                pub fn path() -> String {
                    "/api/progress/lesson/complete".to_string()
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
                #[serde(rename_all = "camelCase")]
                pub struct Request {
                    pub lesson_id: LessonId,
                    pub course_id: CourseId,
                    /// Playback position in whole seconds
                    pub watch_time: u32,
                }

                /// The response to the `POST` `api/progress/lesson/complete` request
                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
                #[serde(rename_all = "camelCase")]
                pub struct Response {
                    /// Aggregate progress of the whole course after this completion
                    pub course_progress: Percent,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        Ok(())
                    }
                }
            }
        }
    }

    pub mod notes {
        pub mod lesson {
            pub mod get {
                use crate::{LessonId, Note, Validate, ValidationError};

                pub fn path(lesson: &LessonId) -> String {
                    format!("/api/notes/lesson/{}", crate::segment(lesson.as_str()))
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub notes: Vec<Note>,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        if self.notes.iter().any(|n| n.id.0.is_empty()) {
                            return Err(ValidationError::EmptyId("note"));
                        }
                        Ok(())
                    }
                }
            }
        }

        pub mod create {
            pub mod post {
                use crate::{CourseId, LessonId, Note, Validate, ValidationError};

                pub fn path() -> String {
                    "/api/notes/create".to_string()
                }

                #[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
                #[serde(rename_all = "camelCase")]
                pub struct Request {
                    pub lesson_id: LessonId,
                    pub course_id: CourseId,
                    pub title: String,
                    pub content: String,
                    /// Playback position in whole seconds
                    pub timestamp: u32,
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub note: Note,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        if self.note.id.0.is_empty() {
                            return Err(ValidationError::EmptyId("note"));
                        }
                        Ok(())
                    }
                }
            }
        }

        pub mod id {
            pub mod delete {
                use crate::NoteId;

                pub fn path(id: &NoteId) -> String {
                    format!("/api/notes/{}", crate::segment(id.as_str()))
                }

                pub type Response = crate::Empty;
            }
        }
    }

    pub mod teachers {
        pub mod apply {
            pub mod post {
                use crate::{TeacherApplication, Validate, ValidationError};

                pub fn path() -> String {
                    "/api/teachers/apply".to_string()
                }

                #[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
                pub struct Request {
                    pub expertise: String,
                    pub bio: String,
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub application: TeacherApplication,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        Ok(())
                    }
                }
            }
        }
    }

    pub mod admin {
        pub mod teachers {
            pub mod get {
                use crate::{TeacherApplication, Validate, ValidationError};

                pub fn path() -> String {
                    "/api/admin/teachers".to_string()
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub applications: Vec<TeacherApplication>,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        Ok(())
                    }
                }
            }

            pub mod review {
                pub mod put {
                    use crate::{ApplicationId, TeacherApplication, Validate, ValidationError};

                    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
                    pub enum Decision {
                        Approve,
                        Reject,
                    }

                    impl Decision {
                        pub fn as_str(self) -> &'static str {
                            match self {
                                Self::Approve => "approve",
                                Self::Reject => "reject",
                            }
                        }
                    }

                    pub fn path(id: &ApplicationId, decision: Decision) -> String {
                        format!(
                            "/api/admin/teachers/{}/{}",
                            crate::segment(id.as_str()),
                            decision.as_str()
                        )
                    }

                    #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                    pub struct Response {
                        pub application: TeacherApplication,
                    }

                    impl Validate for Response {
                        fn validate(&self) -> Result<(), ValidationError> {
                            Ok(())
                        }
                    }
                }
            }
        }

        pub mod users {
            pub mod get {
                use crate::{User, Validate, ValidationError};

                pub fn path() -> String {
                    "/api/admin/users".to_string()
                }

                #[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq)]
                pub struct Response {
                    pub users: Vec<User>,
                }

                impl Validate for Response {
                    fn validate(&self) -> Result<(), ValidationError> {
                        if self.users.iter().any(|u| u.id.0.is_empty()) {
                            return Err(ValidationError::EmptyId("user"));
                        }
                        Ok(())
                    }
                }
            }

            pub mod delete {
                use crate::UserId;

                pub fn path(id: &UserId) -> String {
                    format!("/api/admin/users/{}", crate::segment(id.as_str()))
                }

                pub type Response = crate::Empty;
            }
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use googletest::prelude::*;

    #[googletest::gtest]
    fn deserialize_ack_without_message() -> googletest::Result<()> {
        let ack: Ack = serde_json::from_str(r#"{"success": true, "playbackUrl": "x"}"#).or_fail()?;
        expect_that!(
            ack,
            eq(&Ack {
                success: true,
                message: None
            })
        );
        Ok(())
    }

    #[googletest::gtest]
    fn deserialize_video_url_response() -> googletest::Result<()> {
        use api::courses::video_url::post::Response;

        let response: Response = serde_json::from_str(
            r#"{"success": true, "playbackUrl": "https://cdn.example.com/L2.m3u8"}"#,
        )
        .or_fail()?;
        expect_that!(response.playback_url, eq("https://cdn.example.com/L2.m3u8"));
        expect_that!(response.validate(), ok(anything()));

        let empty = Response {
            playback_url: " ".to_string(),
        };
        expect_that!(
            empty.validate(),
            err(eq(&ValidationError::EmptyPlaybackUrl))
        );
        Ok(())
    }

    #[googletest::gtest]
    fn serialize_complete_request() -> googletest::Result<()> {
        use api::progress::complete::post::Request;

        let request = Request {
            lesson_id: LessonId::from("L1"),
            course_id: CourseId::from("c1"),
            watch_time: 42,
        };
        expect_that!(
            serde_json::to_string(&request).or_fail()?,
            eq(r#"{"lessonId":"L1","courseId":"c1","watchTime":42}"#)
        );
        Ok(())
    }

    #[googletest::gtest]
    fn complete_response_rejects_out_of_range_progress() -> googletest::Result<()> {
        use api::progress::complete::post::Response;

        expect_that!(
            serde_json::from_str::<Response>(r#"{"success": true, "courseProgress": 140}"#),
            err(anything())
        );
        let response: Response =
            serde_json::from_str(r#"{"success": true, "courseProgress": 50}"#).or_fail()?;
        expect_that!(response.course_progress.get(), eq(50));
        Ok(())
    }

    #[googletest::gtest]
    fn endpoint_paths() -> googletest::Result<()> {
        use api::admin::teachers::review::put::{Decision, path as review_path};

        expect_that!(api::courses::slug::get::path("intro-js"), eq("/api/courses/intro-js"));
        expect_that!(
            api::notes::id::delete::path(&NoteId::from("n1")),
            eq("/api/notes/n1")
        );
        expect_that!(
            review_path(&ApplicationId::from("a1"), Decision::Reject),
            eq("/api/admin/teachers/a1/reject")
        );
        Ok(())
    }

    #[googletest::gtest]
    fn path_segments_are_encoded() -> googletest::Result<()> {
        expect_that!(
            api::courses::slug::get::path("c++/basics?lang=bn#top"),
            eq("/api/courses/c%2B%2B%2Fbasics%3Flang%3Dbn%23top")
        );
        expect_that!(
            api::progress::lesson::get::path(&LessonId::from("a b")),
            eq("/api/progress/lesson/a%20b")
        );
        expect_that!(
            api::courses::slug::get::path("জাভাস্ক্রিপ্ট"),
            not(contains_substring("জা"))
        );
        Ok(())
    }
}
