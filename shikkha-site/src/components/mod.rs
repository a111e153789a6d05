pub mod modal;
pub mod notes;
pub mod progress;
pub mod syllabus;
