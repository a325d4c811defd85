//! In-process stand-in for the timetable backend.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, Request, State};
use axum::http::{header::AUTHORIZATION, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use quickshed::config::ClientConfig;
use quickshed::console::Console;
use quickshed::gateway::{
    Credentials, SlotAssignment, SlotRef, Subject, SubjectDraft, Teacher, TeacherDraft,
    TeacherSubject, TimetableEntry, TokenPair,
};
use quickshed::notify::{Notifier, RecordingNotifier};
use quickshed::session::Session;
use quickshed::timetable::Day;

pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const ROTATED_ACCESS_TOKEN: &str = "access-2";
pub const PASSWORD: &str = "correct-horse";

/// Paths served without a bearer token.
const ANONYMOUS: [&str; 4] = [
    "/api/login/",
    "/api/admin/login/",
    "/api/register/",
    "/api/token/refresh/",
];

#[derive(Debug, Default)]
pub struct Backend {
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub assignments: Vec<TeacherSubject>,
    pub entries: Vec<TimetableEntry>,
    /// Sent verbatim after `entries` on every timetable read.
    pub raw_entries: Vec<Value>,
    pub users: Vec<String>,
    pub revoked: Vec<String>,
    pub requests: Vec<(Method, String)>,
    pub failing: HashSet<String>,
    pub tokens: HashSet<String>,
    next_id: u64,
}

impl Backend {
    fn seeded() -> Self {
        let mut backend = Backend {
            next_id: 100,
            ..Default::default()
        };
        backend.tokens.insert(ACCESS_TOKEN.to_string());
        backend.users.push("admin@school.edu".to_string());
        backend.subjects = vec![
            subject(10, 3, "Math", "MA301"),
            subject(11, 3, "Physics", "PH301"),
            subject(12, 4, "Databases", "CS401"),
        ];
        backend.teachers = vec![
            teacher(1, "Asha Rao", vec![10]),
            teacher(2, "Vikram Shah", vec![11]),
        ];
        backend.entries = vec![entry(Day::Monday, "09:00-09:50", "Math", "Asha Rao", 3, "A")];
        backend
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

fn subject(id: u64, semester: u32, name: &str, code: &str) -> Subject {
    Subject {
        id,
        semester,
        name: name.to_string(),
        subject_code: code.to_string(),
    }
}

fn teacher(id: u64, name: &str, subjects: Vec<u64>) -> Teacher {
    Teacher {
        id,
        name: name.to_string(),
        phone_number: "9876543210".to_string(),
        department: "COMPUTER SCIENCE".to_string(),
        subjects,
    }
}

pub fn entry(day: Day, slot: &str, subject: &str, teacher: &str, semester: u32, grade: &str) -> TimetableEntry {
    TimetableEntry {
        semester: Some(semester),
        grade: Some(grade.to_string()),
        ..TimetableEntry::new(day, slot, subject, teacher)
    }
}

type Shared = Arc<Mutex<Backend>>;

pub struct MockServer {
    state: Shared,
    base_url: String,
}

impl MockServer {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(Backend::seeded()));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer {
            state,
            base_url: format!("http://{addr}/api/"),
        }
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.state.lock().unwrap()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::with_api_url(self.base_url.clone())
    }

    /// Makes every request to `path` answer 500.
    pub fn fail(&self, path: &str) {
        self.backend().failing.insert(path.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.backend().requests.len()
    }

    /// Requests seen for `path`, any method.
    pub fn requests_to(&self, path: &str) -> usize {
        self.backend().requests.iter().filter(|(_, p)| p == path).count()
    }

    /// A console wired to this server, with notifications recorded.
    pub fn console(&self, session: Session) -> (Console, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let shared: Arc<dyn Notifier> = notifier.clone();
        let console = Console::new(&self.config(), session, shared).unwrap();
        (console, notifier)
    }
}

pub fn signed_in_session() -> Session {
    let session = Session::in_memory();
    session
        .sign_in(&TokenPair {
            access: ACCESS_TOKEN.to_string(),
            refresh: REFRESH_TOKEN.to_string(),
        })
        .unwrap();
    session
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/login/", post(login))
        .route("/api/admin/login/", post(login))
        .route("/api/register/", post(register))
        .route("/api/logout/", post(logout))
        .route("/api/token/refresh/", post(refresh))
        .route("/api/user/", get(current_user))
        .route("/api/teachers/", get(list_teachers).post(create_teacher))
        .route(
            "/api/teachers/assign/",
            get(list_assignments).post(assign).put(unassign),
        )
        .route(
            "/api/teachers/:id/",
            get(get_teacher).patch(update_teacher).delete(delete_teacher),
        )
        .route("/api/subjects/", get(list_subjects).post(create_subject))
        .route(
            "/api/subjects/:id/",
            get(get_subject).patch(update_subject).delete(delete_subject),
        )
        .route("/api/get_timetable_by_semester/", get(timetable))
        .route("/api/add_teacher_and_subject/", post(add_slot))
        .route("/api/remove_subject_from_timetable/", post(remove_subject))
        .route("/api/remove_teacher/", post(remove_teacher))
        .route("/api/populate-timetable/", post(populate))
        .route("/api/remove_all_teacher_subject/", post(remove_all))
        .route("/api/get_structure/", get(structure))
        .layer(middleware::from_fn_with_state(state.clone(), gatekeeper))
        .with_state(state)
}

/// Records every request, injects failures and checks bearer tokens.
async fn gatekeeper(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    {
        let mut backend = state.lock().unwrap();
        backend.requests.push((req.method().clone(), path.clone()));
        if backend.failing.contains(&path) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response();
        }
        let authorized = token.is_some_and(|t| backend.tokens.contains(&t));
        if !ANONYMOUS.contains(&path.as_str()) && !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Authentication credentials were not provided." })),
            )
                .into_response();
        }
    }
    next.run(req).await
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
}

fn message(text: &str) -> Response {
    Json(json!({ "message": text })).into_response()
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    if credentials.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "No active account found with the given credentials" })),
        )
            .into_response();
    }
    Json(TokenPair {
        access: ACCESS_TOKEN.to_string(),
        refresh: REFRESH_TOKEN.to_string(),
    })
    .into_response()
}

async fn register(State(state): State<Shared>, Json(credentials): Json<Credentials>) -> Response {
    let mut backend = state.lock().unwrap();
    if backend.users.contains(&credentials.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "User already exists" })),
        )
            .into_response();
    }
    backend.users.push(credentials.email);
    (StatusCode::CREATED, Json(json!({ "message": "User created" }))).into_response()
}

async fn logout(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(refresh) = body.get("refresh").and_then(Value::as_str) {
        state.lock().unwrap().revoked.push(refresh.to_string());
    }
    StatusCode::RESET_CONTENT.into_response()
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    let refresh = body.get("refresh").and_then(Value::as_str).unwrap_or_default();
    if refresh != REFRESH_TOKEN || backend.revoked.iter().any(|r| r == refresh) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token is invalid or expired" })),
        )
            .into_response();
    }
    backend.tokens.insert(ROTATED_ACCESS_TOKEN.to_string());
    Json(json!({ "access": ROTATED_ACCESS_TOKEN })).into_response()
}

async fn current_user() -> Response {
    Json(json!({ "id": 1, "email": "admin@school.edu" })).into_response()
}

async fn list_teachers(State(state): State<Shared>) -> Response {
    Json(state.lock().unwrap().teachers.clone()).into_response()
}

async fn create_teacher(State(state): State<Shared>, Json(draft): Json<TeacherDraft>) -> Response {
    let mut backend = state.lock().unwrap();
    let id = backend.next_id();
    let created = Teacher {
        id,
        name: draft.name.unwrap_or_default(),
        phone_number: draft.phone_number.unwrap_or_default(),
        department: draft
            .department
            .unwrap_or_else(|| "COMPUTER SCIENCE".to_string()),
        subjects: Vec::new(),
    };
    backend.teachers.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn get_teacher(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    match state.lock().unwrap().teachers.iter().find(|t| t.id == id) {
        Some(t) => Json(t.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_teacher(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    Json(draft): Json<TeacherDraft>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let Some(t) = backend.teachers.iter_mut().find(|t| t.id == id) else {
        return not_found();
    };
    if let Some(name) = draft.name {
        t.name = name;
    }
    if let Some(phone) = draft.phone_number {
        t.phone_number = phone;
    }
    if let Some(department) = draft.department {
        t.department = department;
    }
    Json(t.clone()).into_response()
}

async fn delete_teacher(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    let mut backend = state.lock().unwrap();
    let before = backend.teachers.len();
    backend.teachers.retain(|t| t.id != id);
    if backend.teachers.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_assignments(State(state): State<Shared>) -> Response {
    Json(state.lock().unwrap().assignments.clone()).into_response()
}

#[derive(serde::Deserialize)]
struct Pair {
    teacher: u64,
    subject: u64,
}

async fn assign(State(state): State<Shared>, Json(pair): Json<Pair>) -> Response {
    let mut backend = state.lock().unwrap();
    if !backend.subjects.iter().any(|s| s.id == pair.subject) {
        return not_found();
    }
    let Some(t) = backend.teachers.iter_mut().find(|t| t.id == pair.teacher) else {
        return not_found();
    };
    if !t.subjects.contains(&pair.subject) {
        t.subjects.push(pair.subject);
    }
    let id = backend.next_id();
    backend.assignments.push(TeacherSubject {
        id,
        teacher: pair.teacher,
        subject: pair.subject,
        assigned_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    });
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Subject assigned to teacher" })),
    )
        .into_response()
}

async fn unassign(State(state): State<Shared>, Json(pair): Json<Pair>) -> Response {
    let mut backend = state.lock().unwrap();
    let Some(t) = backend.teachers.iter_mut().find(|t| t.id == pair.teacher) else {
        return not_found();
    };
    t.subjects.retain(|s| *s != pair.subject);
    backend
        .assignments
        .retain(|a| !(a.teacher == pair.teacher && a.subject == pair.subject));
    message("Subject unassigned from teacher")
}

async fn list_subjects(State(state): State<Shared>) -> Response {
    Json(state.lock().unwrap().subjects.clone()).into_response()
}

async fn create_subject(State(state): State<Shared>, Json(draft): Json<SubjectDraft>) -> Response {
    let mut backend = state.lock().unwrap();
    let id = backend.next_id();
    let created = Subject {
        id,
        semester: draft.semester.unwrap_or_default(),
        name: draft.name.unwrap_or_default(),
        subject_code: draft.subject_code.unwrap_or_default(),
    };
    backend.subjects.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn get_subject(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    match state.lock().unwrap().subjects.iter().find(|s| s.id == id) {
        Some(s) => Json(s.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_subject(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    Json(draft): Json<SubjectDraft>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let Some(s) = backend.subjects.iter_mut().find(|s| s.id == id) else {
        return not_found();
    };
    if let Some(semester) = draft.semester {
        s.semester = semester;
    }
    if let Some(name) = draft.name {
        s.name = name;
    }
    if let Some(code) = draft.subject_code {
        s.subject_code = code;
    }
    Json(s.clone()).into_response()
}

async fn delete_subject(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    let mut backend = state.lock().unwrap();
    let before = backend.subjects.len();
    backend.subjects.retain(|s| s.id != id);
    if backend.subjects.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn timetable(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let Some(semester) = query.get("semester").and_then(|s| s.parse::<u32>().ok()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "semester is required" })),
        )
            .into_response();
    };
    let grade = query.get("grade");
    let backend = state.lock().unwrap();
    let mut entries: Vec<Value> = backend
        .entries
        .iter()
        .filter(|e| e.semester == Some(semester))
        .filter(|e| grade.is_none() || e.grade.as_ref() == grade)
        .map(|e| serde_json::to_value(e).unwrap())
        .collect();
    entries.extend(backend.raw_entries.iter().cloned());
    Json(entries).into_response()
}

fn same_cell(entry: &TimetableEntry, slot: &SlotRef) -> bool {
    entry.semester == Some(slot.semester)
        && entry.grade == slot.grade
        && entry.day == Some(slot.day)
        && entry.time_slot == slot.time_slot
}

async fn add_slot(State(state): State<Shared>, Json(assignment): Json<SlotAssignment>) -> Response {
    let mut backend = state.lock().unwrap();
    let subject = backend
        .subjects
        .iter()
        .find(|s| s.id == assignment.subject_id)
        .map(|s| s.name.clone());
    let teacher = backend
        .teachers
        .iter()
        .find(|t| t.id == assignment.teacher_id)
        .map(|t| t.name.clone());
    let (Some(subject), Some(teacher)) = (subject, teacher) else {
        return not_found();
    };

    let slot = &assignment.slot;
    match backend.entries.iter().position(|e| same_cell(e, slot)) {
        Some(i) => {
            let existing = &mut backend.entries[i];
            existing.subject = Some(subject);
            existing.teacher = Some(teacher);
        }
        None => backend.entries.push(TimetableEntry {
            day: Some(slot.day),
            time_slot: slot.time_slot.clone(),
            subject: Some(subject),
            teacher: Some(teacher),
            semester: Some(slot.semester),
            grade: slot.grade.clone(),
        }),
    }
    message("Teacher and subject added to timetable")
}

async fn remove_subject(State(state): State<Shared>, Json(slot): Json<SlotRef>) -> Response {
    let mut backend = state.lock().unwrap();
    for e in backend.entries.iter_mut().filter(|e| same_cell(e, &slot)) {
        e.subject = None;
    }
    message("Subject removed from timetable")
}

async fn remove_teacher(State(state): State<Shared>, Json(slot): Json<SlotRef>) -> Response {
    let mut backend = state.lock().unwrap();
    for e in backend.entries.iter_mut().filter(|e| same_cell(e, &slot)) {
        e.teacher = None;
    }
    message("Teacher removed from timetable")
}

async fn populate(State(state): State<Shared>) -> Response {
    let mut backend = state.lock().unwrap();
    let filled = entry(Day::Tuesday, "09:00-09:50", "Physics", "Vikram Shah", 3, "A");
    if !backend
        .entries
        .iter()
        .any(|e| e.day == filled.day && e.time_slot == filled.time_slot)
    {
        backend.entries.push(filled);
    }
    message("Timetable populated")
}

async fn remove_all(State(state): State<Shared>) -> Response {
    state.lock().unwrap().entries.clear();
    message("All assignments removed")
}

async fn structure() -> Response {
    Json(json!({ "3": ["A", "B"], "4": ["A"] })).into_response()
}
