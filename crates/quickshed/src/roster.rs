/// Lookups across the teacher and subject lists
use crate::gateway::{Subject, Teacher};

/// Subjects `teacher` is assigned to, in the order of `subjects`.
pub fn subjects_for_teacher<'a>(teacher: &Teacher, subjects: &'a [Subject]) -> Vec<&'a Subject> {
    subjects
        .iter()
        .filter(|s| teacher.subjects.contains(&s.id))
        .collect()
}

/// Subjects `teacher` could still be assigned, in the order of `subjects`.
pub fn unassigned_subjects<'a>(teacher: &Teacher, subjects: &'a [Subject]) -> Vec<&'a Subject> {
    subjects
        .iter()
        .filter(|s| !teacher.subjects.contains(&s.id))
        .collect()
}

/// True when `teacher` is assigned to the subject with `subject_id`.
pub fn teaches(teacher: &Teacher, subject_id: u64) -> bool {
    teacher.subjects.contains(&subject_id)
}

pub fn find_teacher(teachers: &[Teacher], id: u64) -> Option<&Teacher> {
    teachers.iter().find(|t| t.id == id)
}

pub fn find_subject(subjects: &[Subject], id: u64) -> Option<&Subject> {
    subjects.iter().find(|s| s.id == id)
}

/// Subjects taught in `semester`.
pub fn subjects_in_semester(subjects: &[Subject], semester: u32) -> Vec<&Subject> {
    subjects.iter().filter(|s| s.semester == semester).collect()
}
