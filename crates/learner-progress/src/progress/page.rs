use std::fmt::Write as _;

use super::format::{format_decimal, ProgressBand};
use super::sort::SortDirection;
use super::views::{LearnerProgressView, ProgressDashboard};

pub const DASHBOARD_PATH: &str = "/learner-progress";

const STYLE: &str = "body{font-family:sans-serif;background:#f9fafb;margin:0;padding:2rem}\
.card{background:#fff;border-radius:8px;box-shadow:0 1px 3px #0002;padding:1.5rem;margin-bottom:1rem}\
.entry{display:flex;justify-content:space-between;padding:.5rem 0;border-bottom:1px solid #f3f4f6}\
.bar{width:8rem;height:.5rem;background:#e5e7eb;border-radius:4px;display:inline-block}\
.bar>span{display:block;height:100%;border-radius:4px}\
.band-high{background:#22c55e}.band-medium{background:#3b82f6}\
.band-low{background:#eab308}.band-minimal{background:#ef4444}\
.active{font-weight:bold;text-decoration:underline}";

/// Renders the dashboard page. Filter and sort controls navigate back to [`DASHBOARD_PATH`],
/// so every state change is computed server-side.
pub fn render_dashboard(dashboard: &ProgressDashboard) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    html.push_str("<title>Learner Progress Dashboard</title>");
    writeln!(html, "<style>{STYLE}</style></head><body>").expect("style block");
    html.push_str("<header><h1>Learner Progress Dashboard</h1>");
    html.push_str("<p>Track learner enrolments and progress across courses</p></header>");

    render_controls(&mut html, dashboard);
    render_summary(&mut html, dashboard);

    html.push_str("<section id=\"learners\">");
    if dashboard.learners.is_empty() {
        html.push_str("<div class=\"card empty\"><h3>No learners found</h3>");
        html.push_str("<p>Try adjusting your filters to see results.</p></div>");
    }
    for learner in &dashboard.learners {
        render_learner(&mut html, learner);
    }
    html.push_str("</section>");

    html.push_str("</body></html>");
    html
}

fn render_controls(html: &mut String, dashboard: &ProgressDashboard) {
    writeln!(
        html,
        "<form method=\"get\" action=\"{DASHBOARD_PATH}\" class=\"card\">"
    )
    .expect("form open");
    html.push_str("<label for=\"course-filter\">Filter by Course</label> ");
    html.push_str(
        "<select id=\"course-filter\" name=\"course_id\" onchange=\"this.form.submit()\">",
    );
    html.push_str("<option value=\"\">All Courses</option>");
    for course in &dashboard.courses {
        let selected = if dashboard.selected_course == Some(course.id) {
            " selected"
        } else {
            ""
        };
        writeln!(
            html,
            "<option value=\"{}\"{selected}>{}</option>",
            course.id,
            escape_html(&course.name)
        )
        .expect("course option");
    }
    html.push_str("</select>");

    if let Some(direction) = dashboard.sort_direction {
        writeln!(
            html,
            "<input type=\"hidden\" name=\"sort\" value=\"{direction}\">"
        )
        .expect("sort input");
    }

    html.push_str("<div class=\"sort\">Sort by Progress: ");
    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let class = if dashboard.sort_direction == Some(direction) {
            " class=\"active\""
        } else {
            ""
        };
        writeln!(
            html,
            "<a href=\"{}\"{class}>{}</a> ",
            query_href(dashboard, Some(direction)),
            direction.label()
        )
        .expect("sort link");
    }
    if dashboard.sort_direction.is_some() {
        writeln!(
            html,
            "<a href=\"{}\">Clear</a>",
            query_href(dashboard, None)
        )
        .expect("clear link");
    }
    html.push_str("</div>");

    if dashboard.selected_course.is_some() || dashboard.sort_direction.is_some() {
        writeln!(html, "<p><a href=\"{DASHBOARD_PATH}\">Reset All Filters</a></p>")
            .expect("reset link");
    }
    html.push_str("</form>");
}

fn render_summary(html: &mut String, dashboard: &ProgressDashboard) {
    let summary = &dashboard.summary;
    writeln!(
        html,
        "<section class=\"card summary\"><div><strong>{}</strong> Total Learners</div>\
<div><strong>{}</strong> Total Enrolments</div>\
<div><strong>{}%</strong> Average Progress</div></section>",
        summary.total_learners,
        summary.total_enrolments,
        format_decimal(summary.average_progress)
    )
    .expect("summary block");
}

fn render_learner(html: &mut String, learner: &LearnerProgressView) {
    let band = ProgressBand::for_value(learner.average_progress);
    html.push_str("<article class=\"card\">");
    writeln!(
        html,
        "<h3>{}</h3><p>Courses: {} | Avg Progress: <span class=\"badge {}\" title=\"{}\">{}%</span></p>",
        escape_html(&learner.full_name),
        learner.enrolments.len(),
        band.css_class(),
        band.label(),
        format_decimal(learner.average_progress)
    )
    .expect("card heading");

    if learner.enrolments.is_empty() {
        html.push_str("<p><em>No enrolments</em></p>");
    }
    for entry in &learner.enrolments {
        let value = percentage_value(&entry.progress);
        writeln!(
            html,
            "<div class=\"entry\"><span>{}</span><span><span class=\"bar\"><span class=\"{}\" \
style=\"width:{}%\"></span></span> {}</span></div>",
            escape_html(&entry.course_name),
            ProgressBand::for_value(value).css_class(),
            value.clamp(0.0, 100.0),
            escape_html(&entry.progress)
        )
        .expect("enrolment row");
    }
    html.push_str("</article>");
}

fn query_href(dashboard: &ProgressDashboard, sort: Option<SortDirection>) -> String {
    let mut params = Vec::new();
    if let Some(course_id) = dashboard.selected_course {
        params.push(format!("course_id={course_id}"));
    }
    if let Some(direction) = sort {
        params.push(format!("sort={direction}"));
    }
    if params.is_empty() {
        DASHBOARD_PATH.to_string()
    } else {
        format!("{DASHBOARD_PATH}?{}", params.join("&amp;"))
    }
}

/// Numeric value of a rendered percentage such as `1,234.50%`.
fn percentage_value(rendered: &str) -> f64 {
    rendered
        .trim_end_matches('%')
        .replace(',', "")
        .parse()
        .unwrap_or(0.0)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::domain::{CourseId, LearnerId};
    use crate::progress::views::{
        CourseView, DashboardSummary, EnrolmentProgressEntry, ProgressDashboard,
    };
    use chrono::Utc;

    fn dashboard(learners: Vec<LearnerProgressView>) -> ProgressDashboard {
        let summary = DashboardSummary::from_views(&learners);
        ProgressDashboard {
            learners,
            courses: vec![CourseView {
                id: CourseId(1),
                name: "Maths & <Stats>".to_string(),
            }],
            selected_course: Some(CourseId(1)),
            sort_direction: Some(SortDirection::Desc),
            summary,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn renders_learners_with_escaped_names() {
        let page = render_dashboard(&dashboard(vec![LearnerProgressView {
            id: LearnerId(1),
            full_name: "O'Brien <script>".to_string(),
            enrolments: vec![EnrolmentProgressEntry {
                course_name: "Maths & <Stats>".to_string(),
                progress: "85.50%".to_string(),
            }],
            average_progress: 85.5,
        }]));

        assert!(page.contains("O&#39;Brien &lt;script&gt;"));
        assert!(page.contains("Maths &amp; &lt;Stats&gt;"));
        assert!(page.contains("85.50%"));
        assert!(page.contains("band-high"));
        assert!(page.contains("<option value=\"1\" selected>"));
        assert!(page.contains("href=\"/learner-progress?course_id=1&amp;sort=asc\""));
        assert!(!page.contains("<script>O'Brien"));
    }

    #[test]
    fn empty_states_are_rendered() {
        let page = render_dashboard(&dashboard(Vec::new()));
        assert!(page.contains("No learners found"));

        let page = render_dashboard(&dashboard(vec![LearnerProgressView {
            id: LearnerId(2),
            full_name: "New Learner".to_string(),
            enrolments: Vec::new(),
            average_progress: 0.0,
        }]));
        assert!(page.contains("No enrolments"));
        assert!(page.contains("0.00%"));
    }

    #[test]
    fn sort_controls_navigate_and_carry_current_state() {
        let page = render_dashboard(&dashboard(Vec::new()));

        assert!(!page.contains("<script"));
        assert!(page.contains("<input type=\"hidden\" name=\"sort\" value=\"desc\">"));
        assert!(page.contains(
            "<a href=\"/learner-progress?course_id=1&amp;sort=desc\" class=\"active\">High to Low</a>"
        ));
        assert!(page.contains("<a href=\"/learner-progress?course_id=1&amp;sort=asc\">Low to High</a>"));
        assert!(page.contains("<a href=\"/learner-progress?course_id=1\">Clear</a>"));
        assert!(page.contains("Reset All Filters"));
    }

    #[test]
    fn unsorted_page_has_no_sort_state() {
        let mut unsorted = dashboard(Vec::new());
        unsorted.selected_course = None;
        unsorted.sort_direction = None;
        let page = render_dashboard(&unsorted);

        assert!(!page.contains("name=\"sort\""));
        assert!(!page.contains("Clear"));
        assert!(!page.contains("class=\"active\""));
        assert!(!page.contains("Reset All Filters"));
        assert!(page.contains("<a href=\"/learner-progress?sort=asc\">Low to High</a>"));
    }

    #[test]
    fn percentage_value_strips_grouping() {
        assert_eq!(percentage_value("1,234.50%"), 1234.5);
        assert_eq!(percentage_value("0.00%"), 0.0);
    }
}
