use super::domain::{Course, CourseId, LearnerEnrolments};

/// Read boundary for the dashboard so the service can be exercised without real storage.
///
/// Implementations load everything in a constant number of round trips: learners come back
/// ordered by first name then last name (case-insensitive, ties keep insertion order), each
/// with its enrolments and their courses.
pub trait ProgressRepository: Send + Sync {
    fn learners_with_enrolments(&self) -> Result<Vec<LearnerEnrolments>, RepositoryError>;

    /// All courses ordered by name, case-insensitive.
    fn courses(&self) -> Result<Vec<Course>, RepositoryError>;

    fn course_exists(&self, id: CourseId) -> Result<bool, RepositoryError> {
        Ok(self.courses()?.iter().any(|course| course.id == id))
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
