/// Wire types exchanged with the timetable backend
use crate::timetable::Day;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One scheduled cell as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    /// `None` when the backend sent a day outside the teaching week.
    #[serde(default, deserialize_with = "teaching_day")]
    pub day: Option<Day>,

    pub time_slot: String,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub teacher: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

impl TimetableEntry {
    /// Builds an entry for the given cell with both fields set.
    pub fn new(day: Day, time_slot: &str, subject: &str, teacher: &str) -> Self {
        Self {
            day: Some(day),
            time_slot: time_slot.to_string(),
            subject: Some(subject.to_string()),
            teacher: Some(teacher.to_string()),
            semester: None,
            grade: None,
        }
    }
}

/// Reads a day name, mapping anything that is not a teaching day to `None`.
fn teaching_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Day>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|name| name.parse().ok()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: u64,
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub department: String,
    /// Ids of subjects assigned to this teacher
    #[serde(default)]
    pub subjects: Vec<u64>,
}

/// Body for creating or editing a teacher. Absent fields are left untouched on edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: u64,
    pub semester: u32,
    pub name: String,
    pub subject_code: String,
}

/// Body for creating or editing a subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_code: Option<String>,
}

/// A row of the teacher/subject assignment relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherSubject {
    pub id: u64,
    pub teacher: u64,
    pub subject: u64,
    pub assigned_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub teacher: u64,
    pub subject: u64,
}

/// Identifies one cell of one semester/grade timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    pub semester: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub day: Day,
    pub time_slot: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    #[serde(flatten)]
    pub slot: SlotRef,
    pub subject_id: u64,
    pub teacher_id: u64,
}

/// Semester number to the grades (divisions) that exist for it.
pub type SemesterStructure = BTreeMap<u32, Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: u64,
    pub email: String,
}

/// Plain `{ "message": ... }` acknowledgement most actions answer with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
