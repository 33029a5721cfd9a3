use std::collections::HashMap;

use super::domain::{
    Course, CourseId, EnrolledCourse, Enrolment, EnrolmentId, Learner, LearnerEnrolments,
    LearnerId,
};
use super::repository::{ProgressRepository, RepositoryError};

/// Repository backed by vectors held in memory.
///
/// The store is filled once at start-up (demo data or a CSV roster) and only read afterwards,
/// so it can be shared behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStore {
    learners: Vec<Learner>,
    courses: Vec<Course>,
    enrolments: Vec<Enrolment>,
}

impl InMemoryProgressStore {
    /// Three learners across Mathematics, Science and English.
    pub fn demo() -> Self {
        let mut store = Self::default();
        let john = store.add_learner("John", "Doe");
        let jane = store.add_learner("Jane", "Smith");
        let bob = store.add_learner("Bob", "Johnson");

        let math = store.add_course("Mathematics");
        let science = store.add_course("Science");
        let english = store.add_course("English");

        let seeded = [
            (john, math, Some(85.5)),
            (john, science, Some(92.0)),
            (jane, math, Some(45.0)),
            (jane, english, Some(78.25)),
            (bob, science, Some(0.0)),
        ];
        for (learner, course, progress) in seeded {
            store
                .enrol(learner, course, progress)
                .expect("demo ids were issued by this store");
        }

        store
    }

    pub fn add_learner(&mut self, firstname: &str, lastname: &str) -> LearnerId {
        let id = LearnerId(self.learners.iter().map(|l| l.id.0).max().unwrap_or(0) + 1);
        self.learners.push(Learner {
            id,
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        });
        id
    }

    pub fn add_course(&mut self, name: &str) -> CourseId {
        let id = CourseId(self.courses.iter().map(|c| c.id.0).max().unwrap_or(0) + 1);
        self.courses.push(Course {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Inserts a learner with a caller-chosen id.
    pub fn insert_learner(&mut self, learner: Learner) -> Result<(), StoreError> {
        if self.learner(learner.id).is_some() {
            return Err(StoreError::DuplicateLearner(learner.id));
        }
        self.learners.push(learner);
        Ok(())
    }

    /// Inserts a course with a caller-chosen id.
    pub fn insert_course(&mut self, course: Course) -> Result<(), StoreError> {
        if self.course(course.id).is_some() {
            return Err(StoreError::DuplicateCourse(course.id));
        }
        self.courses.push(course);
        Ok(())
    }

    pub fn enrol(
        &mut self,
        learner_id: LearnerId,
        course_id: CourseId,
        progress: Option<f64>,
    ) -> Result<EnrolmentId, StoreError> {
        if self.learner(learner_id).is_none() {
            return Err(StoreError::UnknownLearner(learner_id));
        }
        if self.course(course_id).is_none() {
            return Err(StoreError::UnknownCourse(course_id));
        }
        if let Some(value) = progress {
            if !value.is_finite() {
                return Err(StoreError::InvalidProgress {
                    learner_id,
                    course_id,
                });
            }
        }

        let id = EnrolmentId(self.enrolments.len() as u64 + 1);
        self.enrolments.push(Enrolment {
            id,
            learner_id,
            course_id,
            progress,
        });
        Ok(id)
    }

    pub fn learner(&self, id: LearnerId) -> Option<&Learner> {
        self.learners.iter().find(|learner| learner.id == id)
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn learner_count(&self) -> usize {
        self.learners.len()
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn enrolment_count(&self) -> usize {
        self.enrolments.len()
    }
}

impl ProgressRepository for InMemoryProgressStore {
    fn learners_with_enrolments(&self) -> Result<Vec<LearnerEnrolments>, RepositoryError> {
        let courses: HashMap<CourseId, &Course> =
            self.courses.iter().map(|course| (course.id, course)).collect();

        let mut by_learner: HashMap<LearnerId, Vec<EnrolledCourse>> = HashMap::new();
        for enrolment in &self.enrolments {
            let course = courses.get(&enrolment.course_id).ok_or_else(|| {
                RepositoryError::Unavailable(format!(
                    "enrolment {} references missing course {}",
                    enrolment.id.0, enrolment.course_id
                ))
            })?;
            by_learner
                .entry(enrolment.learner_id)
                .or_default()
                .push(EnrolledCourse {
                    enrolment: enrolment.clone(),
                    course: (*course).clone(),
                });
        }

        let mut learners: Vec<LearnerEnrolments> = self
            .learners
            .iter()
            .map(|learner| LearnerEnrolments {
                learner: learner.clone(),
                enrolments: by_learner.remove(&learner.id).unwrap_or_default(),
            })
            .collect();

        learners.sort_by_cached_key(|record| {
            (
                record.learner.firstname.to_lowercase(),
                record.learner.lastname.to_lowercase(),
            )
        });

        Ok(learners)
    }

    fn courses(&self) -> Result<Vec<Course>, RepositoryError> {
        let mut courses = self.courses.clone();
        courses.sort_by_cached_key(|course| course.name.to_lowercase());
        Ok(courses)
    }

    fn course_exists(&self, id: CourseId) -> Result<bool, RepositoryError> {
        Ok(self.course(id).is_some())
    }
}

/// Seeding failures; the store never changes after start-up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("learner {0} is already present")]
    DuplicateLearner(LearnerId),
    #[error("course {0} is already present")]
    DuplicateCourse(CourseId),
    #[error("learner {0} does not exist")]
    UnknownLearner(LearnerId),
    #[error("course {0} does not exist")]
    UnknownCourse(CourseId),
    #[error("progress for learner {learner_id} in course {course_id} must be a finite number")]
    InvalidProgress {
        learner_id: LearnerId,
        course_id: CourseId,
    },
}
