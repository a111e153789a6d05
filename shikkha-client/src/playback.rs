//! Lifetime of the adaptive streaming session bound to the video element.
//!
//! Two rules hold at all times:
//! - At most one streaming session is alive. [`SessionSlot`] destroys the current session before it
//!   asks the backend for a new one, and when it is dropped.
//! - Asynchronous results are tagged with the [`Ticket`] of the lesson they were started for, and
//!   results for a lesson that is no longer active are discarded.

use std::rc::Rc;

use shikkha_api::LessonId;

use crate::error::Result;

/// Monotonic counter bumped every time a lesson is activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Identity of one activation of a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: Generation,
    pub lesson: LessonId,
}

/// A quality level announced by the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityLevel {
    pub index: usize,
    /// Vertical resolution in pixels, 0 if unknown
    pub height: u32,
    /// Bits per second
    pub bitrate: u64,
}

impl QualityLevel {
    pub fn label(&self) -> String {
        if self.height > 0 {
            format!("{}p", self.height)
        } else {
            format!("{} kbps", self.bitrate / 1000)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QualitySelection {
    /// Let the streaming library pick the level from the measured bandwidth
    #[default]
    Auto,
    Level(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    ManifestParsed(Vec<QualityLevel>),
    Error { fatal: bool, details: String },
}

/// How a playback URL ended up bound to the video element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachKind {
    /// Through a streaming session of the adaptive bitrate library
    Adaptive,
    /// As the plain `src` of the element, which plays the manifest natively
    Native,
}

pub enum Attachment<S> {
    Adaptive(S),
    Native,
}

/// A live adaptive streaming session. Dropping it destroys the session and detaches it from the
/// video element.
pub trait StreamingSession {
    fn set_quality(&self, selection: QualitySelection);
}

pub trait StreamingBackend {
    type Session: StreamingSession;

    /// Loads `url` into the video element. Fails with [`crate::ClientError::Stream`] when neither
    /// the adaptive library nor the element itself can play it.
    fn attach(
        &self,
        url: &str,
        on_event: Rc<dyn Fn(StreamEvent)>,
    ) -> Result<Attachment<Self::Session>>;

    /// Unbinds a natively played manifest from the video element, so it stops playing.
    fn detach_native(&self);
}

/// Owner of the single streaming session of a video element.
pub struct SessionSlot<B: StreamingBackend> {
    backend: B,
    current: Option<(Ticket, Attachment<B::Session>)>,
}

impl<B: StreamingBackend> SessionSlot<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Binds `url` for the lesson of `ticket`. Any previous session is destroyed first, also when
    /// attaching fails.
    pub fn attach(
        &mut self,
        ticket: &Ticket,
        url: &str,
        on_event: impl Fn(Ticket, StreamEvent) + 'static,
    ) -> Result<AttachKind> {
        self.release();

        let event_ticket = ticket.clone();
        let on_event: Rc<dyn Fn(StreamEvent)> =
            Rc::new(move |event| on_event(event_ticket.clone(), event));

        let attachment = self.backend.attach(url, on_event)?;
        let kind = match &attachment {
            Attachment::Adaptive(_) => {
                log::debug!("Attached adaptive stream for lesson {}", ticket.lesson);
                AttachKind::Adaptive
            }
            Attachment::Native => {
                log::debug!("Playing lesson {} natively", ticket.lesson);
                AttachKind::Native
            }
        };
        self.current = Some((ticket.clone(), attachment));
        Ok(kind)
    }

    /// Destroys the current session, or unbinds the natively played manifest.
    pub fn release(&mut self) {
        match self.current.take() {
            Some((ticket, Attachment::Adaptive(session))) => {
                log::debug!("Destroying stream of lesson {}", ticket.lesson);
                drop(session);
            }
            Some((ticket, Attachment::Native)) => {
                log::debug!("Detaching native stream of lesson {}", ticket.lesson);
                self.backend.detach_native();
            }
            None => {}
        }
    }

    pub fn set_quality(&self, selection: QualitySelection) {
        if let Some((_, Attachment::Adaptive(session))) = &self.current {
            session.set_quality(selection);
        }
    }

    /// Ticket of the lesson bound to the video element
    pub fn current(&self) -> Option<&Ticket> {
        self.current.as_ref().map(|(ticket, _)| ticket)
    }
}

impl<B: StreamingBackend> Drop for SessionSlot<B> {
    fn drop(&mut self) {
        self.release();
    }
}
