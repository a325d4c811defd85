use super::{Console, ConsoleError};
use crate::gateway::{ApiMessage, SemesterStructure};
use crate::session::Route;
use tracing::info;

/// Headline numbers of the admin home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSummary {
    pub teacher_count: usize,
    pub subject_count: usize,
    pub structure: SemesterStructure,
}

impl AdminSummary {
    pub fn division_count(&self) -> usize {
        self.structure.values().map(Vec::len).sum()
    }
}

impl Console {
    /// Loads teacher, subject and semester data concurrently.
    pub async fn admin_summary(&self) -> Result<AdminSummary, ConsoleError> {
        self.enter(&Route::AdminHome)?;

        let result = futures::try_join!(
            self.api.list_teachers(),
            self.api.list_subjects(),
            self.api.get_structure(),
        );
        let (teachers, subjects, structure) = self.report(result, None, "Failed to fetch data")?;

        info!(
            teachers = teachers.len(),
            subjects = subjects.len(),
            semesters = structure.len(),
            "Dashboard loaded"
        );
        Ok(AdminSummary {
            teacher_count: teachers.len(),
            subject_count: subjects.len(),
            structure,
        })
    }

    /// Semesters and their divisions, as listed on the user home screen.
    pub async fn structure(&self) -> Result<SemesterStructure, ConsoleError> {
        self.enter(&Route::UserDashboard)?;
        let result = self.api.get_structure().await;
        self.report(result, None, "Failed to fetch semester data")
    }

    /// Asks the backend to fill every timetable automatically.
    pub async fn populate(&self) -> Result<ApiMessage, ConsoleError> {
        self.enter(&Route::AdminHome)?;
        let result = self.api.populate_timetable().await;
        self.report(result, Some("Timetable populated"), "Error populating timetable")
    }

    /// Clears every slot assignment of every timetable.
    pub async fn clear_all(&self) -> Result<ApiMessage, ConsoleError> {
        self.enter(&Route::AdminHome)?;
        let result = self.api.remove_all_assignments().await;
        self.report(result, Some("All assignments removed"), "Error removing assignments")
    }
}
