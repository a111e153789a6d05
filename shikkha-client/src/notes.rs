//! Notes of a lesson and the playback position helpers shared with the progress side channel.
//!
//! There is no optimistic update: after every mutation the list of the lesson is fetched again.

use shikkha_api::api::notes::create::post::Request;
use shikkha_api::{CourseId, NoteId};

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::playback::Ticket;
use crate::player::PlayerAction;
use crate::transport::Transport;

/// Playback position in whole seconds. Fractions are floored, negative or non-finite positions
/// count as 0.
pub fn watch_time(position: f64) -> u32 {
    if position.is_finite() && position > 0.0 {
        position.floor().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// A note being written by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// Builds the create request for the lesson of `ticket`. Blank titles or contents are rejected
    /// here, before anything is sent.
    pub fn into_request(self, ticket: &Ticket, course: &CourseId, position: f64) -> Result<Request> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() {
            return Err(ClientError::InvalidDraft("note title is empty"));
        }
        if content.is_empty() {
            return Err(ClientError::InvalidDraft("note content is empty"));
        }

        Ok(Request {
            lesson_id: ticket.lesson.clone(),
            course_id: course.clone(),
            title: title.to_string(),
            content: content.to_string(),
            timestamp: watch_time(position),
        })
    }
}

/// Fetches the notes of the lesson of `ticket`.
pub async fn reload<T: Transport>(client: &ApiClient<T>, ticket: Ticket) -> PlayerAction {
    match client.notes(&ticket.lesson).await {
        Ok(notes) => PlayerAction::NotesLoaded { ticket, notes },
        Err(e) => {
            log::error!("Failed to fetch notes of lesson {}: {e}", ticket.lesson);
            PlayerAction::LessonFailed {
                message: e.user_message(),
                ticket,
            }
        }
    }
}

pub async fn create<T: Transport>(
    client: &ApiClient<T>,
    ticket: Ticket,
    course: &CourseId,
    draft: NoteDraft,
    position: f64,
) -> PlayerAction {
    let request = match draft.into_request(&ticket, course, position) {
        Ok(request) => request,
        Err(e) => {
            return PlayerAction::LessonFailed {
                ticket,
                message: e.user_message(),
            };
        }
    };

    if let Err(e) = client.create_note(&request).await {
        log::error!("Failed to create note: {e}");
        return PlayerAction::LessonFailed {
            ticket,
            message: e.user_message(),
        };
    }
    reload(client, ticket).await
}

/// Deletes a note. The user has already confirmed the deletion.
pub async fn delete<T: Transport>(
    client: &ApiClient<T>,
    ticket: Ticket,
    note: &NoteId,
) -> PlayerAction {
    if let Err(e) = client.delete_note(note).await {
        log::error!("Failed to delete note {note}: {e}");
        return PlayerAction::LessonFailed {
            ticket,
            message: e.user_message(),
        };
    }
    reload(client, ticket).await
}
