//! Line-based text rendering for the CLI pages.
//!
//! Every function returns a `String` so output can be asserted on;
//! the caller decides where it goes.

use std::fmt::Write;

use crate::error::LiftlogError;
use crate::models::{
    ChartRange, ChatMessage, ChatRole, Exercise, MostUsedExercise, ProgressPoint, User, Workout,
};
use crate::state::Totals;
use crate::view_state::PagePhase;

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Widest bar in the progress chart.
const BAR_WIDTH: usize = 30;

/// Status icons.
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
}

/// Main header.
///
/// ```text
/// LIFTLOG · DASHBOARD
/// ════════════════════════════════════════════════════════════
/// ```
pub fn header(title: &str) -> String {
    format!("{}\n{}\n", title, "═".repeat(LINE_WIDTH))
}

/// Section heading with a thin rule underneath.
pub fn section(title: &str) -> String {
    format!("\n{}\n{}\n", title, "─".repeat(LINE_WIDTH))
}

/// Indented line with a leading icon.
pub fn line(icon: &str, message: &str) -> String {
    format!("  {} {}\n", icon, message)
}

/// One-line summary for a page that has nothing to show yet.
///
/// `None` when the page is ready and the caller should render content.
pub fn phase_line(phase: &PagePhase) -> Option<String> {
    match phase {
        PagePhase::Ready => None,
        PagePhase::NoIdentity => Some(line(
            icons::WARNING,
            "Not signed in. Set LIFTLOG_EMAIL and LIFTLOG_PASSWORD.",
        )),
        PagePhase::Loading => Some(line("…", "Loading")),
        PagePhase::Errored(e) => Some(error_line(e)),
    }
}

/// Failure line followed by what the user can do about it.
///
/// ```text
///   ✗ Authentication problem: Please sign in to continue.
///     Sign in again
/// ```
pub fn error_line(error: &LiftlogError) -> String {
    let category = error.category();
    format!(
        "{}    {}\n",
        line(
            icons::FAILURE,
            &format!("{}: {}", category.description(), error.user_message())
        ),
        error.recovery_hint()
    )
}

fn signed_in_as(out: &mut String, user: Option<&User>) {
    if let Some(user) = user {
        let _ = writeln!(out, "Signed in as {}", user.label());
    }
}

fn stars(rating: u32) -> String {
    let filled = rating.min(crate::models::MAX_RATING) as usize;
    let empty = crate::models::MAX_RATING as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

fn workout_row(workout: &Workout) -> String {
    format!(
        "#{:<5} {:<24} {:<12} {}",
        workout.id,
        workout.name,
        workout.formatted_date(),
        stars(workout.stars())
    )
}

pub fn dashboard(
    user: Option<&User>,
    phase: &PagePhase,
    recent: &[Workout],
    most_used: &[MostUsedExercise],
    totals: &Totals,
) -> String {
    let mut out = header("LIFTLOG · DASHBOARD");
    signed_in_as(&mut out, user);
    if let Some(status) = phase_line(phase) {
        out.push_str(&status);
        return out;
    }

    out.push_str(&section("TOTALS"));
    let _ = writeln!(out, "  Weight lifted:   {:.1} kg", totals.total_weight);
    let _ = writeln!(out, "  Exercises done:  {}", totals.total_exercises);

    out.push_str(&section("RECENT WORKOUTS"));
    if recent.is_empty() {
        out.push_str(&line(icons::WARNING, "No workouts yet"));
    }
    for workout in recent {
        let _ = writeln!(out, "  {}", workout_row(workout));
    }

    out.push_str(&section("MOST USED EXERCISES"));
    if most_used.is_empty() {
        out.push_str(&line(icons::WARNING, "Nothing logged yet"));
    }
    for row in most_used {
        let _ = writeln!(out, "  {:<30} {:>4}x", row.exercise, row.times_performed);
    }
    out
}

/// Exercise catalog page; `visible` is already filtered and sliced.
pub fn exercises(
    phase: &PagePhase,
    category: &str,
    visible: &[Exercise],
    page: usize,
    total_pages: usize,
) -> String {
    let mut out = header("LIFTLOG · EXERCISES");
    if let Some(status) = phase_line(phase) {
        out.push_str(&status);
        return out;
    }

    out.push_str(&section(&format!("CATEGORY: {}", category.to_uppercase())));
    if visible.is_empty() {
        out.push_str(&line(icons::WARNING, "No exercises in this category"));
    }
    for exercise in visible {
        let _ = writeln!(
            out,
            "  #{:<5} {:<28} {}",
            exercise.id,
            exercise.name,
            exercise.categories.join(", ")
        );
    }
    out.push_str(&page_footer(page, total_pages));
    out
}

pub fn workouts(phase: &PagePhase, visible: &[Workout], page: usize, total_pages: usize) -> String {
    let mut out = header("LIFTLOG · WORKOUTS");
    if let Some(status) = phase_line(phase) {
        out.push_str(&status);
        return out;
    }

    out.push_str(&section("HISTORY"));
    if visible.is_empty() {
        out.push_str(&line(icons::WARNING, "No workouts yet"));
    }
    for workout in visible {
        let _ = writeln!(out, "  {}", workout_row(workout));
        if let Some(comments) = workout.comments.as_deref().filter(|c| !c.is_empty()) {
            let _ = writeln!(out, "         {}", comments);
        }
    }
    out.push_str(&page_footer(page, total_pages));
    out
}

/// Horizontal bar chart, one bar per point, scaled to the largest value.
pub fn progress(
    phase: &PagePhase,
    exercise: Option<&Exercise>,
    range: ChartRange,
    points: &[ProgressPoint],
) -> String {
    let mut out = header("LIFTLOG · PROGRESS");
    if let Some(status) = phase_line(phase) {
        out.push_str(&status);
        return out;
    }
    let Some(exercise) = exercise else {
        out.push_str(&line(icons::WARNING, "No exercises to chart"));
        return out;
    };

    out.push_str(&section(&format!("{} · {}", exercise.name.to_uppercase(), range)));
    if points.is_empty() {
        out.push_str(&line(icons::WARNING, "No data in this range"));
        return out;
    }

    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    for point in points {
        let width = if max > 0.0 {
            ((point.value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "  {}  {:<width$} {:.1}",
            point.recorded_at.format("%Y-%m-%d"),
            "█".repeat(width),
            point.value,
            width = BAR_WIDTH
        );
    }
    out
}

/// Conversation transcript, oldest turn first. `error` is the last
/// chat failure, shown under the transcript.
pub fn chat(phase: &PagePhase, messages: &[ChatMessage], error: Option<&LiftlogError>) -> String {
    let mut out = header("LIFTLOG · ASSISTANT");
    if let Some(status) = phase_line(phase) {
        out.push_str(&status);
        return out;
    }
    for message in messages {
        let speaker = match message.role {
            ChatRole::User => "you",
            role => role.as_str(),
        };
        let _ = writeln!(out, "\n  {}", speaker);
        for text in message.content.lines() {
            let _ = writeln!(out, "    {}", text);
        }
    }
    if let Some(error) = error {
        out.push('\n');
        out.push_str(&error_line(error));
    }
    out
}

fn page_footer(page: usize, total_pages: usize) -> String {
    if total_pages <= 1 {
        return String::new();
    }
    format!("\n  Page {} of {}\n", page, total_pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn workout(id: u64, name: &str, rating: u32) -> Workout {
        serde_json::from_value(serde_json::json!({
            "id": id, "nombre": name, "fecha": "2024-05-01", "valoracion": rating
        }))
        .unwrap()
    }

    #[test]
    fn test_chat_transcript_and_error() {
        let messages = [
            ChatMessage::user("Plan my week"),
            ChatMessage::assistant("Mon: squat\nThu: deadlift"),
        ];
        let out = chat(&PagePhase::Ready, &messages, None);
        assert!(out.contains("  you\n    Plan my week\n"));
        assert!(out.contains("    Thu: deadlift\n"));
        assert!(!out.contains(icons::FAILURE));

        let err = LiftlogError::server(502, "");
        let out = chat(&PagePhase::Ready, &messages, Some(&err));
        assert!(out.contains(icons::FAILURE));
    }

    #[test]
    fn test_header_uses_full_width_rule() {
        let h = header("LIFTLOG");
        assert!(h.starts_with("LIFTLOG\n"));
        assert_eq!(h.lines().nth(1).unwrap().chars().count(), LINE_WIDTH);
    }

    #[test]
    fn test_non_ready_phase_short_circuits() {
        let out = dashboard(None, &PagePhase::NoIdentity, &[], &[], &Totals::default());
        assert!(out.contains("Not signed in"));
        assert!(!out.contains("TOTALS"));

        let err = LiftlogError::Unauthenticated;
        let out = workouts(&PagePhase::Errored(err), &[], 1, 1);
        assert!(out.contains(icons::FAILURE));
    }

    #[test]
    fn test_error_line_names_category_and_next_step() {
        let out = error_line(&LiftlogError::Unauthenticated);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  ✗ Authentication problem: "));
        assert_eq!(lines[1], "    Sign in again");

        let out = error_line(&LiftlogError::server(503, ""));
        assert!(out.contains("Server-side issue"));
        assert!(out.contains("Refresh to try again"));
    }

    #[test]
    fn test_dashboard_lists_totals_and_workouts() {
        let totals = Totals {
            total_weight: 2500.0,
            total_exercises: 2,
        };
        let out = dashboard(
            None,
            &PagePhase::Ready,
            &[workout(1, "Legs", 4)],
            &[],
            &totals,
        );
        assert!(out.contains("2500.0 kg"));
        assert!(out.contains("Legs"));
        assert!(out.contains("★★★★☆"));
        assert!(out.contains("Nothing logged yet"));
    }

    #[test]
    fn test_page_footer_only_with_several_pages() {
        assert!(!workouts(&PagePhase::Ready, &[], 1, 1).contains("Page"));
        assert!(workouts(&PagePhase::Ready, &[], 2, 3).contains("Page 2 of 3"));
    }

    #[test]
    fn test_progress_bars_scale_to_max() {
        let exercise: Exercise =
            serde_json::from_value(serde_json::json!({"id": 1, "name": "Squat"})).unwrap();
        let points = vec![
            ProgressPoint {
                recorded_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
                value: 50.0,
            },
            ProgressPoint {
                recorded_at: Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap(),
                value: 100.0,
            },
        ];
        let out = progress(&PagePhase::Ready, Some(&exercise), ChartRange::OneMonth, &points);
        let bars: Vec<usize> = out
            .lines()
            .filter(|l| l.contains("2024-06"))
            .map(|l| l.matches('█').count())
            .collect();
        assert_eq!(bars, vec![BAR_WIDTH / 2, BAR_WIDTH]);
        assert!(out.contains("SQUAT · 1M"));
    }
}
