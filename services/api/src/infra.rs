use learner_progress::progress::{InMemoryProgressStore, RosterImportError, RosterImporter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Imports the roster when one is given, otherwise seeds the demo learners.
pub(crate) fn load_store(roster: Option<&Path>) -> Result<InMemoryProgressStore, RosterImportError> {
    let store = match roster {
        Some(path) => {
            let store = RosterImporter::from_path(path)?;
            info!(
                path = %path.display(),
                learners = store.learner_count(),
                courses = store.course_count(),
                enrolments = store.enrolment_count(),
                "roster imported"
            );
            store
        }
        None => {
            info!("no roster configured, using demo learners");
            InMemoryProgressStore::demo()
        }
    };
    Ok(store)
}
