//! Timetable screens: viewing, editing and printing.

use super::{Console, ConsoleError};
use crate::roster;
use crate::session::Route;
use crate::timetable::{render_print_document, Day, TimetablePage};
use tracing::warn;

/// Which console a timetable is opened from. Only admins may edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRealm {
    Admin,
    User,
}

impl ViewRealm {
    fn route(self, semester: u32, grade: Option<&str>) -> Route {
        let grade = grade.map(str::to_string);
        match self {
            ViewRealm::Admin => Route::AdminSemester { semester, grade },
            ViewRealm::User => Route::UserSemester { semester, grade },
        }
    }
}

impl Console {
    /// Opens and loads the timetable of `semester` (and `grade`).
    pub async fn timetable(
        &self,
        realm: ViewRealm,
        semester: u32,
        grade: Option<&str>,
    ) -> Result<TimetablePage<'_>, ConsoleError> {
        self.enter(&realm.route(semester, grade))?;
        let page = TimetablePage::open(
            &self.api,
            self.notifier.as_ref(),
            semester,
            grade.map(str::to_string),
        )
        .await?;
        Ok(page)
    }

    /// Fills an empty cell. The teacher must already be assigned to the subject.
    pub async fn assign_slot(
        &self,
        semester: u32,
        grade: Option<&str>,
        day: Day,
        slot: &str,
        subject: u64,
        teacher: u64,
    ) -> Result<TimetablePage<'_>, ConsoleError> {
        let mut page = self.timetable(ViewRealm::Admin, semester, grade).await?;

        let result = self.api.get_teacher(teacher).await;
        let details = self.report(result, None, "Error fetching teacher details")?;
        if !roster::teaches(&details, subject) {
            warn!(teacher, subject, "Teacher is not assigned to subject");
            let e = ConsoleError::NotQualified { teacher, subject };
            self.notifier.error(&e.to_string());
            return Err(e);
        }

        page.assign(day, slot, subject, teacher).await?;
        Ok(page)
    }

    /// Clears an occupied cell.
    pub async fn clear_slot(
        &self,
        semester: u32,
        grade: Option<&str>,
        day: Day,
        slot: &str,
    ) -> Result<TimetablePage<'_>, ConsoleError> {
        let mut page = self.timetable(ViewRealm::Admin, semester, grade).await?;
        page.remove(day, slot).await?;
        Ok(page)
    }

    /// The printable HTML document of a timetable.
    pub async fn print_document(
        &self,
        realm: ViewRealm,
        semester: u32,
        grade: Option<&str>,
    ) -> Result<String, ConsoleError> {
        let page = self.timetable(realm, semester, grade).await?;
        Ok(render_print_document(
            page.grid(),
            &page.print_header(),
            self.print_delay,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realm_routes() {
        assert_eq!(
            ViewRealm::Admin.route(3, Some("A")),
            Route::AdminSemester {
                semester: 3,
                grade: Some("A".to_string())
            }
        );
        assert_eq!(
            ViewRealm::User.route(4, None),
            Route::UserSemester {
                semester: 4,
                grade: None
            }
        );
    }
}
