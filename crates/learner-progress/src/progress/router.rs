use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{error, info, warn};

use crate::error::AppError;

use super::page::{render_dashboard, DASHBOARD_PATH};
use super::repository::ProgressRepository;
use super::service::{
    DashboardQuery, LearnerProgressService, ProgressServiceError, RawDashboardQuery,
};
use super::views::ProgressDashboard;

/// Router builder exposing the dashboard as JSON and as an HTML page.
pub fn progress_router<R>(service: Arc<LearnerProgressService<R>>) -> Router
where
    R: ProgressRepository + 'static,
{
    Router::new()
        .route("/api/v1/learner-progress", get(dashboard_json_handler::<R>))
        .route(DASHBOARD_PATH, get(dashboard_page_handler::<R>))
        .with_state(service)
}

fn load_dashboard<R>(
    service: &LearnerProgressService<R>,
    raw: &RawDashboardQuery,
) -> Result<ProgressDashboard, ProgressServiceError>
where
    R: ProgressRepository + 'static,
{
    let query = DashboardQuery::parse(raw)?;
    service.dashboard(query)
}

pub(crate) async fn dashboard_json_handler<R>(
    State(service): State<Arc<LearnerProgressService<R>>>,
    Query(raw): Query<RawDashboardQuery>,
) -> Result<Json<ProgressDashboard>, AppError>
where
    R: ProgressRepository + 'static,
{
    match load_dashboard(&service, &raw) {
        Ok(dashboard) => {
            info!(learners = dashboard.learners.len(), "learner progress served");
            Ok(Json(dashboard))
        }
        Err(err) => {
            match &err {
                ProgressServiceError::Validation(error) => {
                    warn!(field = error.field(), %error, "dashboard query rejected")
                }
                ProgressServiceError::Repository(error) => {
                    error!(%error, "learner progress unavailable")
                }
            }
            Err(err.into())
        }
    }
}

pub(crate) async fn dashboard_page_handler<R>(
    State(service): State<Arc<LearnerProgressService<R>>>,
    Query(raw): Query<RawDashboardQuery>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match load_dashboard(&service, &raw) {
        Ok(dashboard) => Html(render_dashboard(&dashboard)).into_response(),
        Err(ProgressServiceError::Validation(error)) => {
            warn!(field = error.field(), %error, "dashboard query rejected, redirecting");
            (StatusCode::FOUND, [(header::LOCATION, DASHBOARD_PATH)]).into_response()
        }
        Err(other) => {
            error!(error = %other, "learner progress page unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Learner progress is temporarily unavailable</h1>".to_string()),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::domain::{Course, LearnerEnrolments};
    use crate::progress::repository::RepositoryError;
    use crate::progress::store::InMemoryProgressStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    struct UnavailableRepository;

    impl ProgressRepository for UnavailableRepository {
        fn learners_with_enrolments(&self) -> Result<Vec<LearnerEnrolments>, RepositoryError> {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }

        fn courses(&self) -> Result<Vec<Course>, RepositoryError> {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }
    }

    fn demo_router() -> Router {
        let service = LearnerProgressService::new(Arc::new(InMemoryProgressStore::demo()));
        progress_router(Arc::new(service))
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn text_body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn json_endpoint_returns_dashboard() {
        let response = get(demo_router(), "/api/v1/learner-progress").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let learners = body["learners"].as_array().expect("learners array");
        assert_eq!(learners.len(), 3);
        assert_eq!(learners[0]["full_name"], "Bob Johnson");
        assert_eq!(learners[0]["enrolments"][0]["progress"], "0.00%");
        assert_eq!(body["courses"].as_array().expect("courses").len(), 3);
        assert!(body.get("selected_course").is_none());
    }

    #[tokio::test]
    async fn json_endpoint_filters_and_sorts() {
        let response = get(demo_router(), "/api/v1/learner-progress?course_id=1&sort=desc").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let names: Vec<&str> = body["learners"]
            .as_array()
            .expect("learners array")
            .iter()
            .map(|learner| learner["full_name"].as_str().expect("name"))
            .collect();
        assert_eq!(names, ["John Doe", "Jane Smith"]);
        assert_eq!(body["selected_course"], 1);
        assert_eq!(body["sort_direction"], "desc");
    }

    #[tokio::test]
    async fn json_endpoint_rejects_unknown_course() {
        let response = get(demo_router(), "/api/v1/learner-progress?course_id=99999").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["field"], "course_id");
        assert_eq!(body["error"], "course 99999 does not exist");
    }

    #[tokio::test]
    async fn json_endpoint_rejects_invalid_sort() {
        let response = get(demo_router(), "/api/v1/learner-progress?sort=invalid").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["field"], "sort");
    }

    #[tokio::test]
    async fn json_endpoint_reports_repository_failure() {
        let service = LearnerProgressService::new(Arc::new(UnavailableRepository));
        let response = get(
            progress_router(Arc::new(service)),
            "/api/v1/learner-progress",
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("database offline"));
        assert!(body.get("field").is_none());
    }

    #[tokio::test]
    async fn page_lists_learners_and_progress() {
        let response = get(demo_router(), "/learner-progress").await;
        assert_eq!(response.status(), StatusCode::OK);

        let page = text_body(response).await;
        for expected in [
            "John Doe",
            "Jane Smith",
            "Bob Johnson",
            "Mathematics",
            "Science",
            "English",
            "85.50%",
            "92.00%",
            "45.00%",
            "78.25%",
            "0.00%",
        ] {
            assert!(page.contains(expected), "page should contain {expected}");
        }
    }

    #[tokio::test]
    async fn page_filter_hides_learners_outside_course() {
        let response = get(demo_router(), "/learner-progress?course_id=1").await;
        let page = text_body(response).await;
        assert!(page.contains("John Doe"));
        assert!(page.contains("Jane Smith"));
        assert!(!page.contains("Bob Johnson"));
    }

    #[tokio::test]
    async fn page_sort_orders_cards() {
        let response = get(demo_router(), "/learner-progress?sort=desc").await;
        let page = text_body(response).await;
        let john = page.find("John Doe").expect("john");
        let jane = page.find("Jane Smith").expect("jane");
        let bob = page.find("Bob Johnson").expect("bob");
        assert!(john < jane && jane < bob);
    }

    #[tokio::test]
    async fn page_redirects_on_invalid_parameters() {
        for uri in [
            "/learner-progress?course_id=99999",
            "/learner-progress?sort=invalid",
        ] {
            let response = get(demo_router(), uri).await;
            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(
                response.headers().get(header::LOCATION).expect("location"),
                "/learner-progress"
            );
        }
    }
}
