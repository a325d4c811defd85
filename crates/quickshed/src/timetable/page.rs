//! The editable timetable of one semester/grade.
//!
//! The grid shown is always the last successful fetch. Mutations go to the
//! backend first and are only reflected after a full re-fetch; a failed call
//! leaves the grid untouched and raises exactly one error notification.

use super::{is_time_slot, Day, PrintHeader, TimetableGrid};
use crate::gateway::{ApiClient, GatewayError, SlotAssignment, SlotRef};
use crate::notify::Notifier;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("'{0}' is not a time slot of the timetable")]
    UnknownSlot(String),

    #[error("{day} {slot} is already assigned")]
    CellOccupied { day: Day, slot: String },

    #[error("{day} {slot} has nothing to remove")]
    CellEmpty { day: Day, slot: String },
}

pub struct TimetablePage<'a> {
    api: &'a ApiClient,
    notifier: &'a dyn Notifier,
    semester: u32,
    grade: Option<String>,
    grid: TimetableGrid,
}

impl<'a> TimetablePage<'a> {
    /// A page with an empty grid; call [`TimetablePage::refresh`] to load it.
    pub fn new(
        api: &'a ApiClient,
        notifier: &'a dyn Notifier,
        semester: u32,
        grade: Option<String>,
    ) -> Self {
        Self {
            api,
            notifier,
            semester,
            grade,
            grid: TimetableGrid::default(),
        }
    }

    /// Creates the page and loads it.
    pub async fn open(
        api: &'a ApiClient,
        notifier: &'a dyn Notifier,
        semester: u32,
        grade: Option<String>,
    ) -> Result<TimetablePage<'a>, PageError> {
        let mut page = Self::new(api, notifier, semester, grade);
        page.refresh().await?;
        Ok(page)
    }

    pub fn grid(&self) -> &TimetableGrid {
        &self.grid
    }

    pub fn semester(&self) -> u32 {
        self.semester
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    pub fn print_header(&self) -> PrintHeader {
        PrintHeader {
            semester: self.semester,
            grade: self.grade.clone(),
        }
    }

    /// Replaces the grid with what the backend currently holds.
    pub async fn refresh(&mut self) -> Result<(), PageError> {
        match self
            .api
            .get_timetable(self.semester, self.grade.as_deref())
            .await
        {
            Ok(entries) => {
                info!(
                    semester = self.semester,
                    grade = ?self.grade,
                    entries = entries.len(),
                    "Timetable loaded"
                );
                self.grid = TimetableGrid::new(entries);
                Ok(())
            }
            Err(e) => {
                warn!(semester = self.semester, error = %e, "Failed to load timetable");
                self.notifier.error("Failed to load timetable");
                Err(e.into())
            }
        }
    }

    /// Puts `subject_id` taught by `teacher_id` into an empty cell.
    pub async fn assign(
        &mut self,
        day: Day,
        slot: &str,
        subject_id: u64,
        teacher_id: u64,
    ) -> Result<(), PageError> {
        if let Err(e) = self.check_slot(slot) {
            self.notifier.error(&e.to_string());
            return Err(e);
        }
        if !self.grid.cell(day, slot).is_assignable() {
            let e = PageError::CellOccupied {
                day,
                slot: slot.to_string(),
            };
            self.notifier.error(&e.to_string());
            return Err(e);
        }

        let assignment = SlotAssignment {
            slot: self.slot_ref(day, slot),
            subject_id,
            teacher_id,
        };
        if let Err(e) = self.api.add_teacher_and_subject(&assignment).await {
            warn!(day = %day, slot = %slot, error = %e, "Assignment failed");
            self.notifier.error("Failed to assign teacher and subject");
            return Err(e.into());
        }

        self.notifier.success("Teacher and subject assigned");
        self.refresh().await
    }

    /// Clears an occupied cell: subject first, then teacher.
    pub async fn remove(&mut self, day: Day, slot: &str) -> Result<(), PageError> {
        if let Err(e) = self.check_slot(slot) {
            self.notifier.error(&e.to_string());
            return Err(e);
        }
        if !self.grid.cell(day, slot).is_removable() {
            let e = PageError::CellEmpty {
                day,
                slot: slot.to_string(),
            };
            self.notifier.error(&e.to_string());
            return Err(e);
        }

        let slot_ref = self.slot_ref(day, slot);
        let outcome = match self.api.remove_subject(&slot_ref).await {
            Ok(_) => self.api.remove_teacher(&slot_ref).await,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!(day = %day, slot = %slot, error = %e, "Removal failed");
            self.notifier.error("Failed to remove assignment");
            return Err(e.into());
        }

        self.notifier.success("Assignment removed");
        self.refresh().await
    }

    fn check_slot(&self, slot: &str) -> Result<(), PageError> {
        if is_time_slot(slot) {
            Ok(())
        } else {
            Err(PageError::UnknownSlot(slot.to_string()))
        }
    }

    fn slot_ref(&self, day: Day, slot: &str) -> SlotRef {
        SlotRef {
            semester: self.semester,
            grade: self.grade.clone(),
            day,
            time_slot: slot.to_string(),
        }
    }
}
