//! Navigation inside a course: all sections' lessons flattened into one ordered list.

use shikkha_api::{Course, LessonId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Syllabus {
    lessons: Vec<LessonId>,
}

impl Syllabus {
    pub fn new(course: &Course) -> Self {
        Self {
            lessons: course.lessons().map(|l| l.id.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LessonId> {
        self.lessons.iter()
    }

    /// The lesson played when a course is opened: the first lesson of the first section.
    pub fn first(&self) -> Option<&LessonId> {
        self.lessons.first()
    }

    pub fn index_of(&self, lesson: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|l| l == lesson)
    }

    pub fn contains(&self, lesson: &LessonId) -> bool {
        self.index_of(lesson).is_some()
    }

    /// `None` at the first lesson, or when `current` is not part of the course.
    pub fn previous(&self, current: &LessonId) -> Option<&LessonId> {
        let index = self.index_of(current)?;
        index.checked_sub(1).and_then(|i| self.lessons.get(i))
    }

    /// `None` at the last lesson, or when `current` is not part of the course.
    pub fn next(&self, current: &LessonId) -> Option<&LessonId> {
        let index = self.index_of(current)?;
        self.lessons.get(index + 1)
    }

    /// One-based position of `current` and the total number of lessons.
    pub fn position(&self, current: &LessonId) -> Option<(usize, usize)> {
        self.index_of(current).map(|i| (i + 1, self.lessons.len()))
    }
}
