use std::rc::Rc;

use http::{Method, header};
use serde::{Serialize, de::DeserializeOwned};

use shikkha_api::api;
use shikkha_api::api::admin::teachers::review::put::Decision;
use shikkha_api::{
    Ack, ApplicationId, Course, CourseId, CourseSummary, Enrollment, LessonId, Note, NoteId,
    Percent, TeacherApplication, User, UserId, Validate,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::transport::{HttpRequest, Transport};

/// Typed client for the Shikkha REST backend.
///
/// Every request goes through a single helper that builds the URL from [`ClientConfig`], attaches
/// the bearer token of the session (if any), checks the HTTP status and the `success` envelope,
/// and validates the decoded payload.
pub struct ApiClient<T> {
    config: Rc<ClientConfig>,
    session: Option<Session>,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: Rc<ClientConfig>, transport: T) -> Self {
        Self {
            config,
            session: None,
            transport,
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    async fn request<R>(&self, method: Method, path: String, body: Option<String>) -> Result<R>
    where
        R: DeserializeOwned + Validate,
    {
        let url = self.config.endpoint(&path);
        let mut headers = vec![];
        if let Some(session) = &self.session {
            headers.push((header::AUTHORIZATION.to_string(), session.authorization()));
        }
        if body.is_some() {
            headers.push((
                header::CONTENT_TYPE.to_string(),
                "application/json".to_string(),
            ));
        }

        log::debug!("{method} {url}");
        let response = self
            .transport
            .send(HttpRequest {
                method: method.clone(),
                url,
                headers,
                body,
            })
            .await
            .inspect_err(|e| log::error!("{method} {path} failed. Error performing HTTP request: {e}"))?;

        if !response.status.is_success() {
            log::error!("{method} {path} failed. Response is not successful: {}", response.status);
            return Err(ClientError::Status(response.status));
        }

        decode(&response.body).inspect_err(|e| log::error!("{method} {path} failed: {e}"))
    }

    async fn send_json<B, R>(&self, method: Method, path: String, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned + Validate,
    {
        let body = serde_json::to_string(body)?;
        self.request(method, path, Some(body)).await
    }

    pub async fn fetch_course(&self, slug: &str) -> Result<Course> {
        let response: api::courses::slug::get::Response = self
            .request(Method::GET, api::courses::slug::get::path(slug), None)
            .await?;
        Ok(response.course)
    }

    /// Resolves a lesson into a temporary playback URL.
    pub async fn video_url(&self, lesson: &LessonId) -> Result<String> {
        use api::courses::video_url::post::{Request, Response, path};

        let request = Request {
            lesson_id: lesson.clone(),
        };
        let response: Response = self.send_json(Method::POST, path(), &request).await?;
        Ok(response.playback_url)
    }

    pub async fn lesson_progress(
        &self,
        lesson: &LessonId,
    ) -> Result<api::progress::lesson::get::Response> {
        self.request(Method::GET, api::progress::lesson::get::path(lesson), None)
            .await
    }

    /// Marks a lesson as completed and returns the updated progress of the course.
    pub async fn complete_lesson(
        &self,
        lesson: &LessonId,
        course: &CourseId,
        watch_time: u32,
    ) -> Result<Percent> {
        use api::progress::complete::post::{Request, Response, path};

        let request = Request {
            lesson_id: lesson.clone(),
            course_id: course.clone(),
            watch_time,
        };
        let response: Response = self.send_json(Method::POST, path(), &request).await?;
        Ok(response.course_progress)
    }

    pub async fn notes(&self, lesson: &LessonId) -> Result<Vec<Note>> {
        let response: api::notes::lesson::get::Response = self
            .request(Method::GET, api::notes::lesson::get::path(lesson), None)
            .await?;
        Ok(response.notes)
    }

    pub async fn create_note(&self, request: &api::notes::create::post::Request) -> Result<Note> {
        use api::notes::create::post::{Response, path};

        let response: Response = self.send_json(Method::POST, path(), request).await?;
        Ok(response.note)
    }

    pub async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let _: api::notes::id::delete::Response = self
            .request(Method::DELETE, api::notes::id::delete::path(id), None)
            .await?;
        Ok(())
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<api::auth::login::post::Response> {
        use api::auth::login::post::{Request, path};

        let request = Request {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::POST, path(), &request).await
    }

    pub async fn list_courses(&self) -> Result<Vec<CourseSummary>> {
        let response: api::courses::get::Response = self
            .request(Method::GET, api::courses::get::path(), None)
            .await?;
        Ok(response.courses)
    }

    pub async fn enroll(&self, course: &CourseId) -> Result<Enrollment> {
        let response: api::courses::enroll::post::Response = self
            .request(Method::POST, api::courses::enroll::post::path(course), None)
            .await?;
        Ok(response.enrollment)
    }

    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>> {
        let response: api::courses::enrolled::get::Response = self
            .request(Method::GET, api::courses::enrolled::get::path(), None)
            .await?;
        Ok(response.enrollments)
    }

    pub async fn delete_course(&self, course: &CourseId) -> Result<()> {
        let _: api::courses::id::delete::Response = self
            .request(Method::DELETE, api::courses::id::delete::path(course), None)
            .await?;
        Ok(())
    }

    pub async fn apply_teacher(
        &self,
        request: &api::teachers::apply::post::Request,
    ) -> Result<TeacherApplication> {
        use api::teachers::apply::post::{Response, path};

        if request.expertise.trim().is_empty() {
            return Err(ClientError::InvalidDraft("expertise is required"));
        }
        let response: Response = self.send_json(Method::POST, path(), request).await?;
        Ok(response.application)
    }

    pub async fn teacher_applications(&self) -> Result<Vec<TeacherApplication>> {
        let response: api::admin::teachers::get::Response = self
            .request(Method::GET, api::admin::teachers::get::path(), None)
            .await?;
        Ok(response.applications)
    }

    pub async fn review_application(
        &self,
        id: &ApplicationId,
        decision: Decision,
    ) -> Result<TeacherApplication> {
        use api::admin::teachers::review::put::{Response, path};

        let response: Response = self.request(Method::PUT, path(id, decision), None).await?;
        Ok(response.application)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let response: api::admin::users::get::Response = self
            .request(Method::GET, api::admin::users::get::path(), None)
            .await?;
        Ok(response.users)
    }

    pub async fn delete_user(&self, id: &UserId) -> Result<()> {
        let _: api::admin::users::delete::Response = self
            .request(Method::DELETE, api::admin::users::delete::path(id), None)
            .await?;
        Ok(())
    }
}

/// Decodes a response body. The envelope is checked first so that a `success: false` answer is
/// reported with the server's message instead of as a shape mismatch.
fn decode<R>(body: &str) -> Result<R>
where
    R: DeserializeOwned + Validate,
{
    // Endpoints that return nothing may answer with an empty body
    let body = if body.trim().is_empty() {
        r#"{"success": true}"#
    } else {
        body
    };

    let ack: Ack = serde_json::from_str(body)?;
    if !ack.success {
        return Err(ClientError::Rejected(ack.message.unwrap_or_default()));
    }

    let response: R = serde_json::from_str(body)?;
    response.validate()?;
    Ok(response)
}
