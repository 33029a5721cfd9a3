use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for learners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(pub u64);

/// Identifier wrapper for courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u64);

/// Identifier wrapper for enrolments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrolmentId(pub u64);

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub id: LearnerId,
    pub firstname: String,
    pub lastname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

/// Link between one learner and one course. `progress` is a percentage, `None` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrolment {
    pub id: EnrolmentId,
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub progress: Option<f64>,
}

/// An enrolment with its course already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrolledCourse {
    pub enrolment: Enrolment,
    pub course: Course,
}

impl EnrolledCourse {
    pub fn course_id(&self) -> CourseId {
        self.course.id
    }

    pub fn progress(&self) -> Option<f64> {
        self.enrolment.progress
    }
}

/// A learner eager-loaded with every enrolment, in enrolment insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerEnrolments {
    pub learner: Learner,
    pub enrolments: Vec<EnrolledCourse>,
}

impl LearnerEnrolments {
    pub fn new(learner: Learner) -> Self {
        Self {
            learner,
            enrolments: Vec::new(),
        }
    }
}
