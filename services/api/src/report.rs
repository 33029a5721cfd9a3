use chrono::Local;
use clap::Args;
use learner_progress::config::AppConfig;
use learner_progress::error::AppError;
use learner_progress::progress::format::format_decimal;
use learner_progress::progress::{
    CourseId, DashboardQuery, LearnerProgressService, ProgressBand, ProgressDashboard,
    SortDirection,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::infra::load_store;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Roster CSV to report on (defaults to PROGRESS_ROSTER_CSV, then the demo data)
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Only include enrolments in this course
    #[arg(long)]
    pub(crate) course_id: Option<u64>,
    /// Order learners by average progress: asc or desc
    #[arg(long)]
    pub(crate) sort: Option<SortDirection>,
    /// Print the dashboard as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        roster,
        course_id,
        sort,
        json,
    } = args;

    let config = AppConfig::load()?;
    let roster = roster.or(config.data.roster_path);
    let store = load_store(roster.as_deref())?;
    let service = LearnerProgressService::new(Arc::new(store));

    let dashboard = service.dashboard(DashboardQuery {
        course_id: course_id.map(CourseId),
        sort,
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        write_json(&mut out, &dashboard)?;
    } else {
        write_report(&mut out, &dashboard)?;
    }
    Ok(())
}

pub(crate) fn write_json<W: Write>(out: &mut W, dashboard: &ProgressDashboard) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, dashboard).map_err(io::Error::other)?;
    writeln!(out)
}

pub(crate) fn write_report<W: Write>(out: &mut W, dashboard: &ProgressDashboard) -> io::Result<()> {
    writeln!(out, "Learner progress dashboard")?;
    writeln!(
        out,
        "Generated {}",
        dashboard
            .generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    )?;

    let course = dashboard.selected_course.and_then(|id| {
        dashboard
            .courses
            .iter()
            .find(|course| course.id == id)
            .map(|course| course.name.as_str())
    });
    writeln!(out, "Course: {}", course.unwrap_or("All Courses"))?;
    if let Some(direction) = dashboard.sort_direction {
        writeln!(out, "Sort: {}", direction.label())?;
    }

    let summary = &dashboard.summary;
    writeln!(
        out,
        "\nSummary: {} learners, {} enrolments, {}% average progress",
        summary.total_learners,
        summary.total_enrolments,
        format_decimal(summary.average_progress)
    )?;

    if dashboard.learners.is_empty() {
        writeln!(out, "\nNo learners found.")?;
        return Ok(());
    }

    writeln!(out, "\nLearners")?;
    for learner in &dashboard.learners {
        writeln!(
            out,
            "- {} ({}% average, {})",
            learner.full_name,
            format_decimal(learner.average_progress),
            ProgressBand::for_value(learner.average_progress).label()
        )?;
        if learner.enrolments.is_empty() {
            writeln!(out, "    no enrolments")?;
        }
        for entry in &learner.enrolments {
            writeln!(out, "    {}: {}", entry.course_name, entry.progress)?;
        }
    }

    Ok(())
}
