//! Read model over a fetched timetable.

use super::{Day, TIME_SLOTS};
use crate::gateway::TimetableEntry;

/// Placeholder for a scheduled cell whose subject is missing.
pub const NO_SUBJECT: &str = "No Subject";
/// Placeholder for a scheduled cell whose teacher is missing.
pub const NO_TEACHER: &str = "No Teacher";

/// What a single (day, slot) cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    /// Nothing scheduled; the cell can be assigned.
    Empty,
    /// Something scheduled; the cell can be cleared.
    Occupied {
        subject: Option<&'a str>,
        teacher: Option<&'a str>,
    },
}

impl<'a> Cell<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Empty cells accept a new assignment.
    pub fn is_assignable(&self) -> bool {
        self.is_empty()
    }

    /// Occupied cells offer removal.
    pub fn is_removable(&self) -> bool {
        !self.is_empty()
    }

    pub fn subject_label(&self) -> Option<&'a str> {
        match self {
            Cell::Empty => None,
            Cell::Occupied { subject, .. } => Some(subject.unwrap_or(NO_SUBJECT)),
        }
    }

    pub fn teacher_label(&self) -> Option<&'a str> {
        match self {
            Cell::Empty => None,
            Cell::Occupied { teacher, .. } => Some(teacher.unwrap_or(NO_TEACHER)),
        }
    }
}

/// One rendered day: its cells in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow<'a> {
    pub day: Day,
    pub cells: Vec<(&'static str, Cell<'a>)>,
}

/// The entries of one semester (and optionally one grade).
///
/// Lookups are linear scans; a timetable holds at most a few dozen entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableGrid {
    entries: Vec<TimetableEntry>,
}

impl TimetableGrid {
    pub fn new(entries: Vec<TimetableEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    /// First entry scheduled at `(day, slot)`, if any.
    pub fn entry_at(&self, day: Day, slot: &str) -> Option<&TimetableEntry> {
        self.entries
            .iter()
            .find(|e| e.day == Some(day) && e.time_slot == slot)
    }

    /// The cell at `(day, slot)`. An entry with neither subject nor teacher is empty.
    pub fn cell(&self, day: Day, slot: &str) -> Cell<'_> {
        match self.entry_at(day, slot) {
            Some(entry) if entry.subject.is_some() || entry.teacher.is_some() => Cell::Occupied {
                subject: entry.subject.as_deref(),
                teacher: entry.teacher.as_deref(),
            },
            _ => Cell::Empty,
        }
    }

    /// Days in week order, each with its cells in slot order.
    pub fn rows(&self) -> Vec<GridRow<'_>> {
        Day::ALL
            .iter()
            .map(|&day| GridRow {
                day,
                cells: TIME_SLOTS
                    .iter()
                    .map(|&slot| (slot, self.cell(day, slot)))
                    .collect(),
            })
            .collect()
    }

    /// Number of occupied cells within the fixed week.
    pub fn occupied_count(&self) -> usize {
        self.rows()
            .iter()
            .flat_map(|r| &r.cells)
            .filter(|(_, c)| !c.is_empty())
            .count()
    }

    /// Entries whose day/slot fall outside the fixed grid; they are never shown.
    pub fn off_grid(&self) -> impl Iterator<Item = &TimetableEntry> {
        self.entries
            .iter()
            .filter(|e| e.day.is_none() || !super::is_time_slot(&e.time_slot))
    }
}
