//! The course player: which lesson is active, how far its video got, and the per-lesson side
//! channel (completion and notes).
//!
//! [`CoursePlayer`] is a pure state machine driven by [`PlayerAction`]s. The asynchronous work it
//! asks for is visible in its state ([`CoursePlayer::pending_url`], [`CoursePlayer::pending_attach`])
//! and is carried out by the functions at the bottom of this module, which turn their outcome
//! back into actions.

use std::collections::BTreeSet;
use std::rc::Rc;

use shikkha_api::{Course, CourseId, Lesson, LessonId, Note, Percent};

use crate::client::ApiClient;
use crate::playback::{
    AttachKind, Generation, QualityLevel, QualitySelection, SessionSlot, StreamEvent,
    StreamingBackend, Ticket,
};
use crate::syllabus::Syllabus;
use crate::transport::Transport;
use crate::{ClientError, notes};

/// Video of the active lesson: `Idle → RequestingUrl → Attaching → Playing | Error`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlaybackState {
    #[default]
    Idle,
    RequestingUrl(Ticket),
    Attaching {
        ticket: Ticket,
        url: String,
    },
    Playing {
        ticket: Ticket,
        kind: AttachKind,
        levels: Vec<QualityLevel>,
        quality: QualitySelection,
    },
    Error {
        ticket: Ticket,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    CourseLoaded(Course),
    Select(LessonId),
    Next,
    Previous,
    UrlResolved { ticket: Ticket, url: String },
    UrlFailed { ticket: Ticket, message: String },
    Attached { ticket: Ticket, kind: AttachKind },
    Stream { ticket: Ticket, event: StreamEvent },
    QualityChosen(QualitySelection),
    ProgressLoaded { ticket: Ticket, completed: bool },
    Completed { lesson: LessonId, course_progress: Percent },
    NotesLoaded { ticket: Ticket, notes: Vec<Note> },
    /// A progress or notes request of the lesson of `ticket` failed
    LessonFailed { ticket: Ticket, message: String },
    Failed(String),
    DismissError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePlayer {
    course: Option<Rc<Course>>,
    syllabus: Syllabus,
    generation: Generation,
    active: Option<Ticket>,
    playback: PlaybackState,
    // Completion is never revoked, lessons are only ever added
    completed: BTreeSet<LessonId>,
    course_progress: Option<Percent>,
    notes: Vec<Note>,
    error: Option<String>,
}

impl CoursePlayer {
    pub fn course(&self) -> Option<&Course> {
        self.course.as_deref()
    }

    pub fn syllabus(&self) -> &Syllabus {
        &self.syllabus
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.active.as_ref()
    }

    pub fn active_lesson(&self) -> Option<&Lesson> {
        let ticket = self.active.as_ref()?;
        self.course.as_ref()?.lesson(&ticket.lesson)
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn is_completed(&self, lesson: &LessonId) -> bool {
        self.completed.contains(lesson)
    }

    pub fn course_progress(&self) -> Option<Percent> {
        self.course_progress
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_previous(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|t| self.syllabus.previous(&t.lesson).is_some())
    }

    pub fn has_next(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|t| self.syllabus.next(&t.lesson).is_some())
    }

    /// The lesson whose playback URL has to be requested
    pub fn pending_url(&self) -> Option<&Ticket> {
        match &self.playback {
            PlaybackState::RequestingUrl(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// The playback URL that has to be bound to the video element
    pub fn pending_attach(&self) -> Option<(&Ticket, &str)> {
        match &self.playback {
            PlaybackState::Attaching { ticket, url } => Some((ticket, url)),
            _ => None,
        }
    }

    /// Quality requested for the live session, if any
    pub fn quality(&self) -> Option<QualitySelection> {
        match &self.playback {
            PlaybackState::Playing { quality, .. } => Some(*quality),
            _ => None,
        }
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        self.active.as_ref() == Some(ticket)
    }

    fn activate(&mut self, lesson: LessonId) {
        self.generation = self.generation.next();
        let ticket = Ticket {
            generation: self.generation,
            lesson,
        };
        log::debug!("Activating lesson {}", ticket.lesson);
        self.active = Some(ticket.clone());
        self.playback = PlaybackState::RequestingUrl(ticket);
        self.notes.clear();
    }

    fn discard_stale(&self, ticket: &Ticket, what: &str) -> bool {
        if self.is_current(ticket) {
            return false;
        }
        log::warn!(
            "Discarding {what} for lesson {} that is no longer active",
            ticket.lesson
        );
        true
    }

    pub fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::CourseLoaded(course) => {
                self.syllabus = Syllabus::new(&course);
                let first = self.syllabus.first().cloned();
                self.course = Some(Rc::new(course));
                self.completed.clear();
                self.course_progress = None;
                match first {
                    Some(lesson) => self.activate(lesson),
                    None => {
                        self.active = None;
                        self.playback = PlaybackState::Idle;
                        self.notes.clear();
                    }
                }
            }
            PlayerAction::Select(lesson) => {
                if !self.syllabus.contains(&lesson) {
                    log::warn!("Ignoring selection of unknown lesson {lesson}");
                } else if self.active.as_ref().is_none_or(|t| t.lesson != lesson)
                    || matches!(self.playback, PlaybackState::Error { .. })
                {
                    // Selecting the failed lesson again retries it
                    self.activate(lesson);
                }
            }
            PlayerAction::Next => {
                let next = self
                    .active
                    .as_ref()
                    .and_then(|t| self.syllabus.next(&t.lesson))
                    .cloned();
                if let Some(lesson) = next {
                    self.activate(lesson);
                }
            }
            PlayerAction::Previous => {
                let previous = self
                    .active
                    .as_ref()
                    .and_then(|t| self.syllabus.previous(&t.lesson))
                    .cloned();
                if let Some(lesson) = previous {
                    self.activate(lesson);
                }
            }
            PlayerAction::UrlResolved { ticket, url } => {
                if self.discard_stale(&ticket, "playback URL") {
                    return;
                }
                if self.pending_url() == Some(&ticket) {
                    self.playback = PlaybackState::Attaching { ticket, url };
                }
            }
            PlayerAction::UrlFailed { ticket, message } => {
                if self.discard_stale(&ticket, "playback failure") {
                    return;
                }
                self.error = Some(message.clone());
                self.playback = PlaybackState::Error { ticket, message };
            }
            PlayerAction::Attached { ticket, kind } => {
                if self.discard_stale(&ticket, "attached stream") {
                    return;
                }
                if matches!(&self.playback, PlaybackState::Attaching { ticket: t, .. } if *t == ticket)
                {
                    self.playback = PlaybackState::Playing {
                        ticket,
                        kind,
                        levels: vec![],
                        quality: QualitySelection::Auto,
                    };
                }
            }
            PlayerAction::Stream { ticket, event } => {
                if self.discard_stale(&ticket, "stream event") {
                    return;
                }
                self.on_stream_event(ticket, event);
            }
            PlayerAction::QualityChosen(selection) => {
                if let PlaybackState::Playing {
                    levels, quality, ..
                } = &mut self.playback
                {
                    match selection {
                        QualitySelection::Level(index) if index >= levels.len() => {
                            log::warn!("Ignoring unknown quality level {index}");
                        }
                        _ => *quality = selection,
                    }
                }
            }
            PlayerAction::ProgressLoaded { ticket, completed } => {
                if self.discard_stale(&ticket, "lesson progress") {
                    return;
                }
                if completed {
                    self.completed.insert(ticket.lesson);
                }
            }
            PlayerAction::Completed {
                lesson,
                course_progress,
            } => {
                self.completed.insert(lesson);
                self.course_progress = Some(course_progress);
            }
            PlayerAction::NotesLoaded { ticket, notes } => {
                if self.discard_stale(&ticket, "notes") {
                    return;
                }
                self.notes = notes;
            }
            PlayerAction::LessonFailed { ticket, message } => {
                if self.discard_stale(&ticket, "lesson failure") {
                    return;
                }
                self.error = Some(message);
            }
            PlayerAction::Failed(message) => {
                self.error = Some(message);
            }
            PlayerAction::DismissError => {
                self.error = None;
            }
        }
    }

    fn on_stream_event(&mut self, ticket: Ticket, event: StreamEvent) {
        match event {
            StreamEvent::ManifestParsed(new_levels) => match &mut self.playback {
                PlaybackState::Playing { levels, .. } => *levels = new_levels,
                PlaybackState::Attaching { .. } => {
                    self.playback = PlaybackState::Playing {
                        ticket,
                        kind: AttachKind::Adaptive,
                        levels: new_levels,
                        quality: QualitySelection::Auto,
                    };
                }
                _ => {}
            },
            StreamEvent::Error {
                fatal: false,
                details,
            } => {
                log::warn!("Non-fatal streaming error on lesson {}: {details}", ticket.lesson);
            }
            StreamEvent::Error {
                fatal: true,
                details,
            } => {
                log::error!("Fatal streaming error on lesson {}: {details}", ticket.lesson);
                let message = ClientError::Stream(details).user_message();
                self.error = Some(message.clone());
                self.playback = PlaybackState::Error { ticket, message };
            }
        }
    }
}

/// Loads a course. Failures become [`PlayerAction::Failed`] with the status code in the message.
pub async fn load_course<T: Transport>(client: &ApiClient<T>, slug: &str) -> PlayerAction {
    match client.fetch_course(slug).await {
        Ok(course) => PlayerAction::CourseLoaded(course),
        Err(e) => {
            log::error!("Failed to fetch course {slug}: {e}");
            PlayerAction::Failed(e.user_message())
        }
    }
}

/// Requests the playback URL of the lesson of `ticket`. The request is not cancelled when the
/// lesson changes; the player discards the answer instead.
pub async fn resolve_playback_url<T: Transport>(
    client: &ApiClient<T>,
    ticket: Ticket,
) -> PlayerAction {
    match client.video_url(&ticket.lesson).await {
        Ok(url) => PlayerAction::UrlResolved { ticket, url },
        Err(e) => {
            log::error!("Failed to get the video URL of lesson {}: {e}", ticket.lesson);
            PlayerAction::UrlFailed {
                ticket,
                message: e.user_message(),
            }
        }
    }
}

/// Binds `url` to the video element. Stream events are delivered through `dispatch`.
pub fn attach_stream<B: StreamingBackend>(
    slot: &mut SessionSlot<B>,
    ticket: Ticket,
    url: &str,
    dispatch: Rc<dyn Fn(PlayerAction)>,
) -> PlayerAction {
    let on_event = move |ticket, event| dispatch(PlayerAction::Stream { ticket, event });
    match slot.attach(&ticket, url, on_event) {
        Ok(kind) => PlayerAction::Attached { ticket, kind },
        Err(e) => {
            log::error!("Failed to attach stream of lesson {}: {e}", ticket.lesson);
            PlayerAction::UrlFailed {
                ticket,
                message: e.user_message(),
            }
        }
    }
}

/// Fetches the completion state and the notes of the lesson of `ticket`.
pub async fn load_lesson_state<T: Transport>(
    client: &ApiClient<T>,
    ticket: Ticket,
) -> Vec<PlayerAction> {
    let mut actions = vec![];
    match client.lesson_progress(&ticket.lesson).await {
        Ok(progress) => actions.push(PlayerAction::ProgressLoaded {
            ticket: ticket.clone(),
            completed: progress.completed,
        }),
        Err(e) => {
            log::error!("Failed to fetch progress of lesson {}: {e}", ticket.lesson);
            actions.push(PlayerAction::LessonFailed {
                ticket: ticket.clone(),
                message: e.user_message(),
            });
        }
    }
    actions.push(notes::reload(client, ticket).await);
    actions
}

/// Marks `lesson` as completed at the given playback position (in seconds).
pub async fn mark_complete<T: Transport>(
    client: &ApiClient<T>,
    course: &CourseId,
    lesson: LessonId,
    position: f64,
) -> PlayerAction {
    match client
        .complete_lesson(&lesson, course, notes::watch_time(position))
        .await
    {
        Ok(course_progress) => PlayerAction::Completed {
            lesson,
            course_progress,
        },
        Err(e) => {
            log::error!("Failed to mark lesson {lesson} as completed: {e}");
            PlayerAction::Failed(e.user_message())
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::testing::{
        COURSE_JSON, MockBackend, MockTransport, client_for, course, video_url_response,
    };
    use googletest::prelude::*;
    use http::Method;
    use std::cell::RefCell;

    fn loaded_player() -> CoursePlayer {
        let mut player = CoursePlayer::default();
        player.apply(PlayerAction::CourseLoaded(course()));
        player
    }

    fn active_lesson_id(player: &CoursePlayer) -> Option<String> {
        player.ticket().map(|t| t.lesson.to_string())
    }

    fn current_ticket(player: &CoursePlayer) -> Ticket {
        player.ticket().cloned().expect("an active lesson")
    }

    #[googletest::gtest]
    fn first_lesson_is_active_after_load() -> googletest::Result<()> {
        let player = loaded_player();

        expect_that!(active_lesson_id(&player), some(eq("L1")));
        expect_that!(player.active_lesson().map(|l| l.title.as_str()), some(eq("Welcome")));
        expect_that!(
            player.playback(),
            matches_pattern!(PlaybackState::RequestingUrl(anything()))
        );
        expect_false!(player.has_previous());
        expect_true!(player.has_next());
        Ok(())
    }

    #[googletest::gtest]
    fn course_without_lessons_stays_idle() -> googletest::Result<()> {
        let mut course = course();
        course.sections.clear();
        let mut player = CoursePlayer::default();
        player.apply(PlayerAction::CourseLoaded(course));

        expect_that!(player.ticket(), none());
        expect_that!(player.playback(), eq(&PlaybackState::Idle));
        expect_that!(player.pending_url(), none());
        Ok(())
    }

    #[googletest::gtest]
    fn next_and_previous_stop_at_boundaries() -> googletest::Result<()> {
        let mut player = loaded_player();

        player.apply(PlayerAction::Previous);
        expect_that!(active_lesson_id(&player), some(eq("L1")));

        player.apply(PlayerAction::Next);
        player.apply(PlayerAction::Next);
        expect_that!(active_lesson_id(&player), some(eq("L3")));
        let ticket = current_ticket(&player);

        player.apply(PlayerAction::Next);
        expect_that!(player.ticket(), some(eq(&ticket)));

        player.apply(PlayerAction::Previous);
        expect_that!(active_lesson_id(&player), some(eq("L2")));
        Ok(())
    }

    #[googletest::gtest]
    fn selecting_the_active_lesson_is_a_no_op() -> googletest::Result<()> {
        let mut player = loaded_player();
        let ticket = current_ticket(&player);

        player.apply(PlayerAction::Select(LessonId::from("L1")));
        expect_that!(player.ticket(), some(eq(&ticket)));

        player.apply(PlayerAction::Select(LessonId::from("missing")));
        expect_that!(player.ticket(), some(eq(&ticket)));
        Ok(())
    }

    #[googletest::gtest]
    fn stale_playback_url_is_discarded() -> googletest::Result<()> {
        let mut player = loaded_player();
        let first = current_ticket(&player);
        player.apply(PlayerAction::Next);
        let second = current_ticket(&player);

        // The answer for L1 arrives after L2 was selected
        player.apply(PlayerAction::UrlResolved {
            ticket: first.clone(),
            url: "https://cdn.example.com/L1.m3u8".to_string(),
        });
        expect_that!(player.pending_url(), some(eq(&second)));

        player.apply(PlayerAction::UrlResolved {
            ticket: second.clone(),
            url: "https://cdn.example.com/L2.m3u8".to_string(),
        });
        expect_that!(
            player.pending_attach(),
            some(eq((&second, "https://cdn.example.com/L2.m3u8")))
        );

        player.apply(PlayerAction::UrlFailed {
            ticket: first,
            message: "late failure".to_string(),
        });
        expect_that!(player.error(), none());
        Ok(())
    }

    #[googletest::gtest]
    fn reselecting_a_lesson_invalidates_older_tickets() -> googletest::Result<()> {
        let mut player = loaded_player();
        let first = current_ticket(&player);
        player.apply(PlayerAction::Next);
        player.apply(PlayerAction::Previous);
        let again = current_ticket(&player);

        expect_that!(again.lesson, eq(&first.lesson));
        expect_that!(again, not(eq(&first)));

        player.apply(PlayerAction::UrlResolved {
            ticket: first,
            url: "https://cdn.example.com/old.m3u8".to_string(),
        });
        expect_that!(player.pending_url(), some(eq(&again)));
        Ok(())
    }

    #[googletest::gtest]
    fn playback_reaches_playing_with_levels() -> googletest::Result<()> {
        let mut player = loaded_player();
        let ticket = current_ticket(&player);
        let levels = vec![
            QualityLevel {
                index: 0,
                height: 360,
                bitrate: 800_000,
            },
            QualityLevel {
                index: 1,
                height: 720,
                bitrate: 2_500_000,
            },
        ];

        player.apply(PlayerAction::UrlResolved {
            ticket: ticket.clone(),
            url: "u".to_string(),
        });
        player.apply(PlayerAction::Attached {
            ticket: ticket.clone(),
            kind: AttachKind::Adaptive,
        });
        player.apply(PlayerAction::Stream {
            ticket: ticket.clone(),
            event: StreamEvent::ManifestParsed(levels.clone()),
        });
        expect_that!(
            player.playback(),
            eq(&PlaybackState::Playing {
                ticket: ticket.clone(),
                kind: AttachKind::Adaptive,
                levels: levels.clone(),
                quality: QualitySelection::Auto,
            })
        );

        player.apply(PlayerAction::QualityChosen(QualitySelection::Level(1)));
        expect_that!(player.quality(), some(eq(QualitySelection::Level(1))));
        player.apply(PlayerAction::QualityChosen(QualitySelection::Level(5)));
        expect_that!(player.quality(), some(eq(QualitySelection::Level(1))));
        player.apply(PlayerAction::QualityChosen(QualitySelection::Auto));
        expect_that!(player.quality(), some(eq(QualitySelection::Auto)));
        Ok(())
    }

    #[googletest::gtest]
    fn stream_errors() -> googletest::Result<()> {
        let mut player = loaded_player();
        let ticket = current_ticket(&player);
        player.apply(PlayerAction::UrlResolved {
            ticket: ticket.clone(),
            url: "u".to_string(),
        });
        player.apply(PlayerAction::Attached {
            ticket: ticket.clone(),
            kind: AttachKind::Adaptive,
        });

        player.apply(PlayerAction::Stream {
            ticket: ticket.clone(),
            event: StreamEvent::Error {
                fatal: false,
                details: "bufferStalledError".to_string(),
            },
        });
        expect_true!(matches!(player.playback(), PlaybackState::Playing { .. }));
        expect_that!(player.error(), none());

        player.apply(PlayerAction::Stream {
            ticket,
            event: StreamEvent::Error {
                fatal: true,
                details: "manifestLoadError".to_string(),
            },
        });
        expect_true!(matches!(player.playback(), PlaybackState::Error { .. }));
        expect_that!(player.error(), some(eq("ভিডিও চালানো যায়নি।")));

        player.apply(PlayerAction::DismissError);
        expect_that!(player.error(), none());
        Ok(())
    }

    #[googletest::gtest]
    fn completion_is_never_revoked() -> googletest::Result<()> {
        let mut player = loaded_player();
        let ticket = current_ticket(&player);
        let lesson = ticket.lesson.clone();

        player.apply(PlayerAction::ProgressLoaded {
            ticket: ticket.clone(),
            completed: true,
        });
        expect_true!(player.is_completed(&lesson));

        player.apply(PlayerAction::ProgressLoaded {
            ticket,
            completed: false,
        });
        expect_true!(player.is_completed(&lesson));
        Ok(())
    }

    #[tokio::test]
    #[googletest::test]
    async fn example_scenario_end_to_end() -> googletest::Result<()> {
        let transport = Rc::new(MockTransport::default());
        transport.respond(Method::GET, "/api/courses/intro-js", 200, COURSE_JSON);
        transport.respond(
            Method::POST,
            "/api/courses/get-video-url",
            200,
            &video_url_response("L1"),
        );
        transport.respond(
            Method::POST,
            "/api/courses/get-video-url",
            200,
            &video_url_response("L2"),
        );
        let client = client_for(&transport, Some("abc123"));

        let backend = MockBackend::adaptive();
        let log = Rc::clone(&backend.log);
        let mut slot = SessionSlot::new(backend);
        let player = Rc::new(RefCell::new(CoursePlayer::default()));
        let dispatch: Rc<dyn Fn(PlayerAction)> = {
            let player = Rc::clone(&player);
            Rc::new(move |action| player.borrow_mut().apply(action))
        };

        dispatch(load_course(&client, "intro-js").await);

        for _ in 0..2 {
            let ticket = player.borrow().pending_url().cloned().expect("a pending request");
            dispatch(resolve_playback_url(&client, ticket).await);
            let (ticket, url) = {
                let player = player.borrow();
                let (ticket, url) = player.pending_attach().expect("a resolved URL");
                (ticket.clone(), url.to_string())
            };
            let action = attach_stream(&mut slot, ticket, &url, Rc::clone(&dispatch));
            dispatch(action);
            player.borrow_mut().apply(PlayerAction::Next);
        }

        // The second "Next" happened at L2, the last lesson of "Basics", and moved to L3
        expect_that!(
            *log.created.borrow(),
            elements_are![
                eq("https://cdn.example.com/L1.m3u8"),
                eq("https://cdn.example.com/L2.m3u8")
            ]
        );
        expect_that!(
            *log.destroyed.borrow(),
            elements_are![eq("https://cdn.example.com/L1.m3u8")]
        );
        expect_that!(log.max_live.get(), eq(1));

        drop(slot);
        expect_that!(log.live.get(), eq(0));
        Ok(())
    }

    #[tokio::test]
    #[googletest::test]
    async fn stale_stream_events_are_ignored() -> googletest::Result<()> {
        let backend = MockBackend::adaptive();
        let log = Rc::clone(&backend.log);
        let mut slot = SessionSlot::new(backend);
        let player = Rc::new(RefCell::new(loaded_player()));
        let dispatch: Rc<dyn Fn(PlayerAction)> = {
            let player = Rc::clone(&player);
            Rc::new(move |action| player.borrow_mut().apply(action))
        };

        let first = current_ticket(&player.borrow());
        dispatch(PlayerAction::UrlResolved {
            ticket: first.clone(),
            url: "L1".to_string(),
        });
        dispatch(attach_stream(&mut slot, first, "L1", Rc::clone(&dispatch)));
        dispatch(PlayerAction::Next);

        // A late fatal error of the L1 session must not affect L2
        let listener = log.listeners.borrow().last().cloned().expect("a listener");
        listener(StreamEvent::Error {
            fatal: true,
            details: "late".to_string(),
        });
        expect_that!(player.borrow().error(), none());
        expect_that!(
            player.borrow().playback(),
            matches_pattern!(PlaybackState::RequestingUrl(anything()))
        );
        Ok(())
    }

    #[tokio::test]
    #[googletest::test]
    async fn marking_complete_twice() -> googletest::Result<()> {
        let transport = Rc::new(MockTransport::default());
        transport.respond(
            Method::POST,
            "/api/progress/lesson/complete",
            200,
            r#"{"success": true, "courseProgress": 33}"#,
        );
        let client = client_for(&transport, Some("abc123"));
        let mut player = loaded_player();
        let lesson = LessonId::from("L1");
        let course_id = player.course().map(|c| c.id.clone()).expect("a loaded course");

        player.apply(mark_complete(&client, &course_id, lesson.clone(), 61.9).await);
        expect_true!(player.is_completed(&lesson));
        expect_that!(player.course_progress().map(Percent::get), some(eq(33)));

        let was_completed = player.is_completed(&lesson);
        let action = mark_complete(&client, &course_id, lesson.clone(), 62.4).await;
        expect_true!(matches!(action, PlayerAction::Completed { .. }));
        player.apply(action);
        expect_true!(was_completed);
        expect_true!(player.is_completed(&lesson));

        let requests = transport.requests();
        expect_that!(
            requests[0].body.as_deref(),
            some(eq(r#"{"lessonId":"L1","courseId":"c1","watchTime":61}"#))
        );
        Ok(())
    }

    #[tokio::test]
    #[googletest::test]
    async fn failed_course_fetch_surfaces_status() -> googletest::Result<()> {
        let transport = Rc::new(MockTransport::default());
        transport.respond(Method::GET, "/api/courses/intro-js", 500, "boom");
        let client = client_for(&transport, Some("abc123"));
        let mut player = CoursePlayer::default();

        player.apply(load_course(&client, "intro-js").await);
        expect_that!(player.course(), none());
        expect_that!(player.error(), some(contains_substring("500")));
        Ok(())
    }

    #[tokio::test]
    #[googletest::test]
    async fn lesson_state_loads_progress_and_notes() -> googletest::Result<()> {
        let transport = Rc::new(MockTransport::default());
        transport.respond(
            Method::GET,
            "/api/progress/lesson/L1",
            200,
            r#"{"success": true, "completed": true, "watchTime": 300}"#,
        );
        transport.respond(
            Method::GET,
            "/api/notes/lesson/L1",
            200,
            r#"{"success": true, "notes": [{"_id": "n1", "lessonId": "L1", "title": "t", "content": "c",
                "timestamp": 12, "createdAt": "2025-03-01T10:15:00Z"}]}"#,
        );
        let client = client_for(&transport, Some("abc123"));
        let mut player = loaded_player();
        let ticket = current_ticket(&player);

        for action in load_lesson_state(&client, ticket).await {
            player.apply(action);
        }
        expect_true!(player.is_completed(&LessonId::from("L1")));
        expect_that!(player.notes().len(), eq(1));
        expect_that!(
            transport.paths(),
            elements_are![eq("GET /api/progress/lesson/L1"), eq("GET /api/notes/lesson/L1")]
        );
        Ok(())
    }

    #[tokio::test]
    #[googletest::test]
    async fn side_channel_failures_of_a_previous_lesson_are_ignored() -> googletest::Result<()> {
        let transport = Rc::new(MockTransport::default());
        transport.respond(Method::GET, "/api/progress/lesson/L1", 500, "");
        transport.respond(Method::GET, "/api/notes/lesson/L1", 500, "");
        let client = client_for(&transport, Some("abc123"));
        let mut player = loaded_player();
        let first = current_ticket(&player);
        player.apply(PlayerAction::Next);

        for action in load_lesson_state(&client, first).await {
            player.apply(action);
        }
        expect_that!(active_lesson_id(&player), some(eq("L2")));
        expect_that!(player.error(), none());

        let second = current_ticket(&player);
        player.apply(PlayerAction::LessonFailed {
            ticket: second,
            message: "notes unavailable".to_string(),
        });
        expect_that!(player.error(), some(eq("notes unavailable")));
        Ok(())
    }

    #[googletest::gtest]
    fn selecting_a_failed_lesson_again_retries_it() -> googletest::Result<()> {
        let mut player = loaded_player();
        let failed = current_ticket(&player);
        player.apply(PlayerAction::UrlFailed {
            ticket: failed.clone(),
            message: "boom".to_string(),
        });
        player.apply(PlayerAction::DismissError);

        player.apply(PlayerAction::Select(LessonId::from("L1")));
        let retry = current_ticket(&player);
        expect_that!(retry.lesson, eq(&failed.lesson));
        expect_that!(retry, not(eq(&failed)));
        expect_that!(player.pending_url(), some(eq(&retry)));

        // A fatal stream error can be retried the same way
        player.apply(PlayerAction::UrlResolved {
            ticket: retry.clone(),
            url: "https://cdn.example.com/L1.m3u8".to_string(),
        });
        player.apply(PlayerAction::Attached {
            ticket: retry.clone(),
            kind: AttachKind::Adaptive,
        });
        player.apply(PlayerAction::Stream {
            ticket: retry.clone(),
            event: StreamEvent::Error {
                fatal: true,
                details: "manifestLoadError".to_string(),
            },
        });
        player.apply(PlayerAction::Select(LessonId::from("L1")));
        expect_that!(player.pending_url().map(|t| t == &retry), some(eq(false)));
        expect_that!(active_lesson_id(&player), some(eq("L1")));
        Ok(())
    }
}
