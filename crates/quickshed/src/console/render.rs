//! Plain-text rendering for the terminal.

use super::AdminSummary;
use crate::gateway::{SemesterStructure, Subject, Teacher, TeacherSubject};
use crate::timetable::{Cell, Day, TimetableGrid, NO_SUBJECT, NO_TEACHER, TIME_SLOTS};
use std::fmt::Write;

const EMPTY_CELL: &str = "-";

/// Time slots down the side, days across the top.
pub fn timetable_text(grid: &TimetableGrid) -> String {
    let mut columns: Vec<Vec<String>> = Vec::with_capacity(Day::ALL.len() + 1);

    let mut slots = vec!["Time".to_string()];
    slots.extend(TIME_SLOTS.iter().map(|s| s.to_string()));
    columns.push(slots);

    for day in Day::ALL {
        let mut column = vec![day.to_string()];
        column.extend(TIME_SLOTS.iter().map(|slot| cell_text(&grid.cell(day, slot))));
        columns.push(column);
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|c| c.iter().map(|s| s.chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in 0..=TIME_SLOTS.len() {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, &width)| format!("{:<width$}", column[row]))
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
        if row == 0 {
            let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            let _ = writeln!(out, "{}", rule.join("-+-"));
        }
    }
    out
}

fn cell_text(cell: &Cell<'_>) -> String {
    match cell {
        Cell::Empty => EMPTY_CELL.to_string(),
        Cell::Occupied { .. } => format!(
            "{} ({})",
            cell.subject_label().unwrap_or(NO_SUBJECT),
            cell.teacher_label().unwrap_or(NO_TEACHER)
        ),
    }
}

pub fn teachers_text(teachers: &[Teacher]) -> String {
    let mut out = String::new();
    for t in teachers {
        let _ = writeln!(
            out,
            "{:>4}  {}  {}  {}  subjects: {}",
            t.id,
            t.name,
            t.phone_number,
            t.department,
            t.subjects.len()
        );
    }
    out
}

pub fn subjects_text(subjects: &[&Subject]) -> String {
    let mut out = String::new();
    for s in subjects {
        let _ = writeln!(
            out,
            "{:>4}  sem {}  {:<10}  {}",
            s.id, s.semester, s.subject_code, s.name
        );
    }
    out
}

pub fn assignments_text(assignments: &[TeacherSubject]) -> String {
    let mut out = String::new();
    for a in assignments {
        let _ = writeln!(
            out,
            "teacher {:>4}  subject {:>4}  since {}",
            a.teacher, a.subject, a.assigned_date
        );
    }
    out
}

/// One line per semester with its divisions.
pub fn structure_text(structure: &SemesterStructure) -> String {
    let mut out = String::new();
    for (semester, grades) in structure {
        let _ = writeln!(out, "Semester {semester}: {}", grades.join(", "));
    }
    out
}

pub fn summary_text(summary: &AdminSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Teachers:  {}", summary.teacher_count);
    let _ = writeln!(out, "Subjects:  {}", summary.subject_count);
    let _ = writeln!(
        out,
        "Semesters: {} ({} divisions)",
        summary.structure.len(),
        summary.division_count()
    );
    out.push_str(&structure_text(&summary.structure));
    out
}
