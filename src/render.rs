//! Human-readable schedule tables.
//!
//! The matrix is transposed so that each line is a round and each column
//! a team. Home games show the opponent's name, away games prefix it
//! with `@`:
//!
//! ```text
//! | ATL  | NYM  | PHI  | MON  |
//! |:-----|:-----|:-----|:-----|
//! | NYM  | @ATL | MON  | @PHI |
//! ```

use crate::models::{ProblemInstance, Schedule, Venue};

/// Label for the fixture of the team in `row` during `round`.
pub fn fixture_label(
    schedule: &Schedule,
    instance: &ProblemInstance,
    row: usize,
    round: usize,
) -> String {
    let name = instance.team_name(schedule.opponent(row, round));
    match schedule.venue(row, round) {
        Venue::Home => name.to_string(),
        Venue::Away => format!("@{name}"),
    }
}

/// Fixture labels, one line per round, one column per team.
pub fn labelled_rounds(schedule: &Schedule, instance: &ProblemInstance) -> Vec<Vec<String>> {
    (0..schedule.rounds())
        .map(|round| {
            (0..schedule.teams())
                .map(|row| fixture_label(schedule, instance, row, round))
                .collect()
        })
        .collect()
}

/// Renders the schedule as a left-aligned markdown pipe table.
pub fn markdown_table(schedule: &Schedule, instance: &ProblemInstance) -> String {
    let header: Vec<&str> = instance.team_names().iter().map(String::as_str).collect();
    let body = labelled_rounds(schedule, instance);

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            body.iter()
                .map(|line| line[col].chars().count())
                .chain(std::iter::once(header[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, header.iter().copied(), &widths);
    out.push_str("\n|");
    for w in &widths {
        out.push(':');
        out.push_str(&"-".repeat(w + 1));
        out.push('|');
    }
    for line in &body {
        out.push('\n');
        push_line(&mut out, line.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    for (cell, w) in cells.zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(w - cell.chars().count()));
        out.push_str(" |");
    }
}

/// Renders the raw matrix as right-aligned, space-separated rows.
pub fn matrix_text(schedule: &Schedule) -> String {
    let width = schedule
        .rows()
        .flatten()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);
    schedule
        .rows()
        .map(|row| {
            row.iter()
                .map(|v| format!("{v:>width$}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
