use super::domain::{Course, CourseId, LearnerId};
use super::format::round_half_up;
use super::sort::SortDirection;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrolmentProgressEntry {
    pub course_name: String,
    pub progress: String,
}

/// Per-learner row of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnerProgressView {
    pub id: LearnerId,
    pub full_name: String,
    pub enrolments: Vec<EnrolmentProgressEntry>,
    pub average_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseView {
    pub id: CourseId,
    pub name: String,
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
        }
    }
}

/// Headline figures for the learners currently shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_learners: usize,
    pub total_enrolments: usize,
    pub average_progress: f64,
}

impl DashboardSummary {
    /// `average_progress` is the mean of the learners' averages, not of every enrolment.
    pub fn from_views(views: &[LearnerProgressView]) -> Self {
        let total_learners = views.len();
        let total_enrolments = views.iter().map(|view| view.enrolments.len()).sum();
        let average_progress = if total_learners == 0 {
            0.0
        } else {
            let total: f64 = views.iter().map(|view| view.average_progress).sum();
            round_half_up(total / total_learners as f64, 2)
        };

        Self {
            total_learners,
            total_enrolments,
            average_progress,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressDashboard {
    pub learners: Vec<LearnerProgressView>,
    pub courses: Vec<CourseView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_course: Option<CourseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    pub summary: DashboardSummary,
    pub generated_at: DateTime<Utc>,
}
