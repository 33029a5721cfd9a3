use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{Course, CourseId, Learner, LearnerId};
use super::store::{InMemoryProgressStore, StoreError};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Store(StoreError),
    Conflict { line: u64, detail: String },
    InvalidProgress { line: u64, value: f64 },
}

impl fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {err}"),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {err}"),
            RosterImportError::Store(err) => write!(f, "could not seed roster: {err}"),
            RosterImportError::Conflict { line, detail } => {
                write!(f, "roster line {line} conflicts with earlier rows: {detail}")
            }
            RosterImportError::InvalidProgress { line, value } => {
                write!(f, "roster line {line} has a non-finite progress value ({value})")
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Store(err) => Some(err),
            RosterImportError::Conflict { .. } | RosterImportError::InvalidProgress { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<StoreError> for RosterImportError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// One line of a roster export. A line without `course_id` only declares the learner.
#[derive(Debug, Deserialize)]
struct RosterRow {
    learner_id: u64,
    firstname: String,
    lastname: String,
    #[serde(default)]
    course_id: Option<u64>,
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default)]
    progress: Option<f64>,
}

/// Loads `learner_id,firstname,lastname,course_id,course_name,progress` rosters.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<InMemoryProgressStore, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<InMemoryProgressStore, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut store = InMemoryProgressStore::default();

        for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let line = index as u64 + 2;
            apply_row(&mut store, row?, line)?;
        }

        Ok(store)
    }
}

fn apply_row(
    store: &mut InMemoryProgressStore,
    row: RosterRow,
    line: u64,
) -> Result<(), RosterImportError> {
    let learner_id = LearnerId(row.learner_id);
    let known_learner = store
        .learner(learner_id)
        .map(|learner| (learner.firstname.clone(), learner.lastname.clone()));

    match known_learner {
        Some((firstname, lastname)) if firstname != row.firstname || lastname != row.lastname => {
            return Err(RosterImportError::Conflict {
                line,
                detail: format!(
                    "learner {learner_id} was '{firstname} {lastname}', now '{} {}'",
                    row.firstname, row.lastname
                ),
            });
        }
        Some(_) => {}
        None => store.insert_learner(Learner {
            id: learner_id,
            firstname: row.firstname,
            lastname: row.lastname,
        })?,
    }

    let Some(course_id) = row.course_id.map(CourseId) else {
        if row.course_name.is_some() || row.progress.is_some() {
            return Err(RosterImportError::Conflict {
                line,
                detail: "course_name or progress given without course_id".to_string(),
            });
        }
        return Ok(());
    };

    let known_course = store.course(course_id).map(|course| course.name.clone());
    match (known_course, row.course_name) {
        (Some(existing), Some(name)) if existing != name => {
            return Err(RosterImportError::Conflict {
                line,
                detail: format!("course {course_id} was '{existing}', now '{name}'"),
            });
        }
        (Some(_), _) => {}
        (None, Some(name)) => store.insert_course(Course {
            id: course_id,
            name,
        })?,
        (None, None) => {
            return Err(RosterImportError::Conflict {
                line,
                detail: format!("course {course_id} first appears without a name"),
            });
        }
    }

    if let Some(value) = row.progress {
        if !value.is_finite() {
            return Err(RosterImportError::InvalidProgress { line, value });
        }
    }

    store.enrol(learner_id, course_id, row.progress)?;
    Ok(())
}
