//! Teacher and subject administration.

use super::{Console, ConsoleError};
use crate::gateway::{ApiMessage, Subject, SubjectDraft, Teacher, TeacherDraft, TeacherSubject};
use crate::roster;
use crate::session::Route;
use crate::validation::{
    validate_new_subject, validate_new_teacher, validate_subject_edit, validate_teacher_edit,
};

/// A teacher with the subjects they are assigned to and the ones still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherProfile {
    pub teacher: Teacher,
    pub assigned: Vec<Subject>,
    pub available: Vec<Subject>,
}

impl Console {
    pub async fn teachers(&self) -> Result<Vec<Teacher>, ConsoleError> {
        self.enter(&Route::AdminTeachers)?;
        let result = self.api.list_teachers().await;
        self.report(result, None, "Error fetching teachers")
    }

    /// A teacher together with the subject selector lists.
    pub async fn teacher_profile(&self, id: u64) -> Result<TeacherProfile, ConsoleError> {
        self.enter(&Route::AdminTeachers)?;
        let result = futures::try_join!(self.api.get_teacher(id), self.api.list_subjects());
        let (teacher, subjects) = self.report(result, None, "Error fetching teacher details")?;

        let assigned = roster::subjects_for_teacher(&teacher, &subjects)
            .into_iter()
            .cloned()
            .collect();
        let available = roster::unassigned_subjects(&teacher, &subjects)
            .into_iter()
            .cloned()
            .collect();
        Ok(TeacherProfile {
            teacher,
            assigned,
            available,
        })
    }

    pub async fn add_teacher(&self, draft: &TeacherDraft) -> Result<Teacher, ConsoleError> {
        self.enter(&Route::AdminTeachers)?;
        validate_new_teacher(draft).map_err(|e| self.reject(e))?;
        let result = self.api.create_teacher(draft).await;
        self.report(result, Some("Teacher added"), "Error adding teacher")
    }

    pub async fn edit_teacher(&self, id: u64, draft: &TeacherDraft) -> Result<Teacher, ConsoleError> {
        self.enter(&Route::AdminTeachers)?;
        validate_teacher_edit(draft).map_err(|e| self.reject(e))?;
        let result = self.api.update_teacher(id, draft).await;
        self.report(result, Some("Teacher updated"), "Error updating teacher")
    }

    pub async fn delete_teacher(&self, id: u64) -> Result<(), ConsoleError> {
        self.enter(&Route::AdminTeachers)?;
        let result = self.api.delete_teacher(id).await;
        self.report(result, Some("Teacher deleted"), "Error deleting teacher")
    }

    /// Lets the teacher take `subject` in timetables.
    pub async fn assign_subject(&self, teacher: u64, subject: u64) -> Result<ApiMessage, ConsoleError> {
        self.enter(&Route::AdminTeachers)?;
        let result = self.api.assign_subject(teacher, subject).await;
        self.report(result, Some("Subject assigned"), "Error assigning subject")
    }

    pub async fn unassign_subject(&self, teacher: u64, subject: u64) -> Result<ApiMessage, ConsoleError> {
        self.enter(&Route::AdminTeachers)?;
        let result = self.api.unassign_subject(teacher, subject).await;
        self.report(result, Some("Subject unassigned"), "Error unassigning subject")
    }

    pub async fn assignments(&self) -> Result<Vec<TeacherSubject>, ConsoleError> {
        self.enter(&Route::AdminTeachers)?;
        let result = self.api.list_assignments().await;
        self.report(result, None, "Error fetching assignments")
    }

    /// All subjects, or only those of one semester.
    pub async fn subjects(&self, semester: Option<u32>) -> Result<Vec<Subject>, ConsoleError> {
        self.enter(&Route::AdminSubjects)?;
        let result = self.api.list_subjects().await;
        let subjects = self.report(result, None, "Error fetching subjects")?;
        Ok(match semester {
            Some(semester) => roster::subjects_in_semester(&subjects, semester)
                .into_iter()
                .cloned()
                .collect(),
            None => subjects,
        })
    }

    pub async fn subject(&self, id: u64) -> Result<Subject, ConsoleError> {
        self.enter(&Route::AdminSubjects)?;
        let result = self.api.get_subject(id).await;
        self.report(result, None, "Error fetching subject details")
    }

    pub async fn add_subject(&self, draft: &SubjectDraft) -> Result<Subject, ConsoleError> {
        self.enter(&Route::AdminSubjects)?;
        validate_new_subject(draft).map_err(|e| self.reject(e))?;
        let result = self.api.create_subject(draft).await;
        self.report(result, Some("Subject added"), "Error adding subject")
    }

    pub async fn edit_subject(&self, id: u64, draft: &SubjectDraft) -> Result<Subject, ConsoleError> {
        self.enter(&Route::AdminSubjects)?;
        validate_subject_edit(draft).map_err(|e| self.reject(e))?;
        let result = self.api.update_subject(id, draft).await;
        self.report(result, Some("Subject updated"), "Error updating subject")
    }

    pub async fn delete_subject(&self, id: u64) -> Result<(), ConsoleError> {
        self.enter(&Route::AdminSubjects)?;
        let result = self.api.delete_subject(id).await;
        self.report(result, Some("Subject deleted"), "Error deleting subject")
    }
}
