use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::aggregate::aggregate;
use super::domain::{Course, CourseId};
use super::repository::{ProgressRepository, RepositoryError};
use super::sort::{sort_by_progress, SortDirection};
use super::views::{CourseView, DashboardSummary, LearnerProgressView, ProgressDashboard};

/// Query parameters exactly as received; nothing here has been validated yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDashboardQuery {
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// Validated dashboard request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub course_id: Option<CourseId>,
    pub sort: Option<SortDirection>,
}

impl DashboardQuery {
    /// Checks the shape of the parameters. Whether the course exists is checked by the service.
    /// Blank values count as absent.
    pub fn parse(raw: &RawDashboardQuery) -> Result<Self, QueryValidationError> {
        let course_id = match non_blank(raw.course_id.as_deref()) {
            Some(value) => match value.parse::<u64>() {
                Ok(id) if id > 0 => Some(CourseId(id)),
                _ => return Err(QueryValidationError::InvalidCourseId(value.to_string())),
            },
            None => None,
        };

        let sort = match non_blank(raw.sort.as_deref()) {
            Some(value) => Some(
                value
                    .parse::<SortDirection>()
                    .map_err(|err| QueryValidationError::InvalidSort(err.0))?,
            ),
            None => None,
        };

        Ok(Self { course_id, sort })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryValidationError {
    #[error("course_id must be a positive integer, got '{0}'")]
    InvalidCourseId(String),
    #[error("course {0} does not exist")]
    UnknownCourse(CourseId),
    #[error("sort must be 'asc' or 'desc', got '{0}'")]
    InvalidSort(String),
}

impl QueryValidationError {
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidCourseId(_) | Self::UnknownCourse(_) => "course_id",
            Self::InvalidSort(_) => "sort",
        }
    }
}

/// Service composing the repository with aggregation and sorting.
pub struct LearnerProgressService<R> {
    repository: Arc<R>,
}

impl<R> LearnerProgressService<R>
where
    R: ProgressRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Learner views, optionally narrowed to one course.
    pub fn learners_with_progress(
        &self,
        course_id: Option<CourseId>,
    ) -> Result<Vec<LearnerProgressView>, ProgressServiceError> {
        let learners = self.repository.learners_with_enrolments()?;
        Ok(aggregate(&learners, course_id))
    }

    /// Courses for the filter drop-down, ordered by name.
    pub fn all_courses(&self) -> Result<Vec<Course>, ProgressServiceError> {
        Ok(self.repository.courses()?)
    }

    pub fn sort_by_progress(
        &self,
        views: &[LearnerProgressView],
        direction: SortDirection,
    ) -> Vec<LearnerProgressView> {
        sort_by_progress(views, direction)
    }

    pub fn dashboard(
        &self,
        query: DashboardQuery,
    ) -> Result<ProgressDashboard, ProgressServiceError> {
        if let Some(course_id) = query.course_id {
            if !self.repository.course_exists(course_id)? {
                return Err(QueryValidationError::UnknownCourse(course_id).into());
            }
        }

        let mut learners = self.learners_with_progress(query.course_id)?;
        if let Some(direction) = query.sort {
            learners = self.sort_by_progress(&learners, direction);
        }

        let courses: Vec<CourseView> = self
            .all_courses()?
            .iter()
            .map(CourseView::from)
            .collect();
        let summary = DashboardSummary::from_views(&learners);

        debug!(
            course_id = ?query.course_id,
            sort = ?query.sort,
            learners = learners.len(),
            "dashboard assembled"
        );

        Ok(ProgressDashboard {
            learners,
            courses,
            selected_course: query.course_id,
            sort_direction: query.sort,
            summary,
            generated_at: Utc::now(),
        })
    }
}

/// Error raised by the progress service.
#[derive(Debug, thiserror::Error)]
pub enum ProgressServiceError {
    #[error(transparent)]
    Validation(#[from] QueryValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
