use clap::Parser;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use weekly_free_time::infrastructure::logging::{DEFAULT_LOG_DIRECTIVES, init_logging};
use weekly_free_time::{
    AppState, FitOutcome, FreeSlot, InfraError, PlanProblem, ScheduleOutcome, TaskFitResponse,
    compute_free_time_impl, fit_task_impl, format_duration, reset_planner_impl,
};

#[derive(Parser, Debug)]
#[command(name = "weekly-free-time", version, about = "Weekly free time calculator")]
struct Args {
    /// Workspace holding config/planner.json
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// Find room for a task of this many minutes; without a value the
    /// configured task duration is used
    #[arg(long, value_name = "MINUTES", num_args = 0..=1)]
    task: Option<Option<u32>>,

    /// Print the structured result as JSON
    #[arg(long)]
    json: bool,

    /// Restore the default planner before computing
    #[arg(long)]
    reset: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    schedule: &'a ScheduleOutcome,
    task_fit: Option<&'a TaskFitResponse>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(error) = init_logging(DEFAULT_LOG_DIRECTIVES) {
        eprintln!("{error}");
    }
    match run(&args) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, InfraError> {
    let state = AppState::new(args.workspace.clone())?;
    if args.reset {
        reset_planner_impl(&state)?;
    }
    let outcome = compute_free_time_impl(&state)?;
    let fit = args
        .task
        .map(|minutes| fit_task_impl(&state, minutes))
        .transpose()?;

    if args.json {
        let report = JsonReport {
            schedule: &outcome,
            task_fit: fit.as_ref(),
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    Ok(render_text(&outcome, fit.as_ref()))
}

fn render_text(outcome: &ScheduleOutcome, fit: Option<&TaskFitResponse>) -> String {
    let mut out = String::new();
    if !outcome.problems.is_empty() {
        let _ = writeln!(out, "Problems:");
        for problem in &outcome.problems {
            let _ = writeln!(out, "  - {problem}");
        }
    }

    let Some(result) = &outcome.result else {
        out.push_str("No computation because of global errors.");
        return out;
    };

    let _ = writeln!(
        out,
        "Total: {} free slots, {} free time this week.",
        result.totals.slot_count,
        format_duration(result.totals.free_minutes)
    );
    for day in &result.days {
        let _ = writeln!(out, "\n{} ({})", day.label, day.date);
        if day.free_slots.is_empty() {
            let _ = writeln!(out, "  No free slot (>= minimum duration).");
        }
        for (index, slot) in day.free_slots.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}–{} ({})",
                index + 1,
                slot.start,
                slot.end,
                format_duration(slot.duration_minutes())
            );
        }
    }

    if let Some(fit) = fit {
        let _ = write!(out, "\n{}", render_fit(fit));
    }
    out.trim_end().to_string()
}

fn render_fit(fit: &TaskFitResponse) -> String {
    let duration = format_duration(fit.required_minutes);
    match &fit.outcome {
        Some(FitOutcome::Single { slot }) => {
            format!("Task ({duration}) fits into {}", describe_slot(slot))
        }
        Some(FitOutcome::Split {
            slots,
            overage_minutes,
            ..
        }) => {
            let parts = slots.iter().map(describe_slot).collect::<Vec<_>>();
            format!(
                "Task ({duration}) fits when split across {} slots: {} ({} left over)",
                slots.len(),
                parts.join(" + "),
                format_duration(*overage_minutes)
            )
        }
        Some(FitOutcome::NoFit) => {
            format!("Task ({duration}) does not fit, not even split across 2-3 slots")
        }
        None => {
            let reason = fit
                .problems
                .iter()
                .find(|problem| matches!(problem, PlanProblem::InvalidTaskDuration))
                .map(ToString::to_string)
                .unwrap_or_else(|| "no computation because of global errors".to_string());
            format!("Task ({duration}) could not be placed: {reason}")
        }
    }
}

fn describe_slot(slot: &FreeSlot) -> String {
    format!(
        "{} {} {}–{}",
        slot.weekday.label(),
        slot.date,
        slot.start,
        slot.end
    )
}
