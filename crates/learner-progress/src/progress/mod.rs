//! Learner enrolment progress: aggregation, sorting, storage boundary, and HTTP surface.

pub mod aggregate;
pub mod domain;
pub mod format;
pub mod page;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;
pub mod sort;
pub mod store;
pub mod views;

pub use aggregate::{aggregate, average_progress};
pub use domain::{
    Course, CourseId, EnrolledCourse, Enrolment, EnrolmentId, Learner, LearnerEnrolments,
    LearnerId,
};
pub use format::{format_progress, full_name, round_half_up, ProgressBand};
pub use page::render_dashboard;
pub use repository::{ProgressRepository, RepositoryError};
pub use roster::{RosterImportError, RosterImporter};
pub use router::progress_router;
pub use service::{
    DashboardQuery, LearnerProgressService, ProgressServiceError, QueryValidationError,
    RawDashboardQuery,
};
pub use sort::{sort_by_progress, InvalidSortDirection, SortDirection};
pub use store::{InMemoryProgressStore, StoreError};
pub use views::{
    CourseView, DashboardSummary, EnrolmentProgressEntry, LearnerProgressView, ProgressDashboard,
};
