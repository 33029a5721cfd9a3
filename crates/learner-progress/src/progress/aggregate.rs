use super::domain::{CourseId, EnrolledCourse, LearnerEnrolments};
use super::format::{format_progress, full_name, progress_value, round_half_up};
use super::views::{EnrolmentProgressEntry, LearnerProgressView};

/// Builds one view per learner, keeping the input order.
///
/// With `course_filter` set, each learner keeps only enrolments in that course and learners
/// left without any are dropped. Without a filter, learners with no enrolments stay in the
/// output with an empty list and a zero average.
pub fn aggregate(
    learners: &[LearnerEnrolments],
    course_filter: Option<CourseId>,
) -> Vec<LearnerProgressView> {
    learners
        .iter()
        .filter_map(|record| {
            let subset: Vec<&EnrolledCourse> = record
                .enrolments
                .iter()
                .filter(|enrolled| course_filter.map_or(true, |id| enrolled.course_id() == id))
                .collect();

            if course_filter.is_some() && subset.is_empty() {
                return None;
            }

            Some(learner_view(record, &subset))
        })
        .collect()
}

fn learner_view(record: &LearnerEnrolments, subset: &[&EnrolledCourse]) -> LearnerProgressView {
    let enrolments = subset
        .iter()
        .map(|enrolled| EnrolmentProgressEntry {
            course_name: enrolled.course.name.clone(),
            progress: format_progress(enrolled.progress()),
        })
        .collect();

    LearnerProgressView {
        id: record.learner.id,
        full_name: full_name(&record.learner.firstname, &record.learner.lastname),
        enrolments,
        average_progress: average_progress(subset.iter().map(|enrolled| enrolled.progress())),
    }
}

/// Mean of raw progress values (unset counts as zero), rounded half-up to 2 decimals.
pub fn average_progress<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (total, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(total, count), value| {
            (total + progress_value(value), count + 1)
        });

    if count == 0 {
        return 0.0;
    }

    round_half_up(total / count as f64, 2)
}
