//! HTTP gateway to the timetable backend.
//!
//! Every backend call goes through [`ApiClient`]. Protected calls attach the
//! bearer token held by the [`Session`]; any transport failure, non-2xx status
//! or undecodable body comes back as a [`GatewayError`] and is never retried.
mod error;
mod types;

pub use error::GatewayError;
pub use types::*;

use crate::config::ClientConfig;
use crate::session::Session;
use rand::Rng;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

const TEACHERS_PATH: &str = "teachers/";
const SUBJECTS_PATH: &str = "subjects/";
const ASSIGN_PATH: &str = "teachers/assign/";
const TIMETABLE_PATH: &str = "get_timetable_by_semester/";
const ADD_SLOT_PATH: &str = "add_teacher_and_subject/";
const REMOVE_SUBJECT_PATH: &str = "remove_subject_from_timetable/";
const REMOVE_TEACHER_PATH: &str = "remove_teacher/";
const POPULATE_PATH: &str = "populate-timetable/";
const REMOVE_ALL_PATH: &str = "remove_all_teacher_subject/";
const STRUCTURE_PATH: &str = "get_structure/";
const USER_PATH: &str = "user/";
const LOGIN_PATH: &str = "login/";
const ADMIN_LOGIN_PATH: &str = "admin/login/";
const REGISTER_PATH: &str = "register/";
const LOGOUT_PATH: &str = "logout/";
const TOKEN_REFRESH_PATH: &str = "token/refresh/";

/// Whether a request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

/// Client for the timetable REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    /// Creates a client for the API configured in `config`.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, GatewayError> {
        let base_url = config.base_url().map_err(|e| GatewayError::UrlError {
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GatewayError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ---- teachers ----

    pub async fn list_teachers(&self) -> Result<Vec<Teacher>, GatewayError> {
        self.fetch(Method::GET, TEACHERS_PATH).await
    }

    pub async fn get_teacher(&self, id: u64) -> Result<Teacher, GatewayError> {
        self.fetch(Method::GET, &format!("{TEACHERS_PATH}{id}/")).await
    }

    pub async fn create_teacher(&self, draft: &TeacherDraft) -> Result<Teacher, GatewayError> {
        self.submit(Method::POST, TEACHERS_PATH, draft).await
    }

    pub async fn update_teacher(
        &self,
        id: u64,
        draft: &TeacherDraft,
    ) -> Result<Teacher, GatewayError> {
        self.submit(Method::PATCH, &format!("{TEACHERS_PATH}{id}/"), draft)
            .await
    }

    pub async fn delete_teacher(&self, id: u64) -> Result<(), GatewayError> {
        let path = format!("{TEACHERS_PATH}{id}/");
        let request = self.request(Method::DELETE, &path, Auth::Bearer)?;
        self.execute(request, Method::DELETE, &path).await.map(|_| ())
    }

    // ---- subjects ----

    pub async fn list_subjects(&self) -> Result<Vec<Subject>, GatewayError> {
        self.fetch(Method::GET, SUBJECTS_PATH).await
    }

    pub async fn get_subject(&self, id: u64) -> Result<Subject, GatewayError> {
        self.fetch(Method::GET, &format!("{SUBJECTS_PATH}{id}/")).await
    }

    pub async fn create_subject(&self, draft: &SubjectDraft) -> Result<Subject, GatewayError> {
        self.submit(Method::POST, SUBJECTS_PATH, draft).await
    }

    pub async fn update_subject(
        &self,
        id: u64,
        draft: &SubjectDraft,
    ) -> Result<Subject, GatewayError> {
        self.submit(Method::PATCH, &format!("{SUBJECTS_PATH}{id}/"), draft)
            .await
    }

    pub async fn delete_subject(&self, id: u64) -> Result<(), GatewayError> {
        let path = format!("{SUBJECTS_PATH}{id}/");
        let request = self.request(Method::DELETE, &path, Auth::Bearer)?;
        self.execute(request, Method::DELETE, &path).await.map(|_| ())
    }

    // ---- teacher/subject relation ----

    pub async fn list_assignments(&self) -> Result<Vec<TeacherSubject>, GatewayError> {
        self.fetch(Method::GET, ASSIGN_PATH).await
    }

    pub async fn assign_subject(
        &self,
        teacher: u64,
        subject: u64,
    ) -> Result<ApiMessage, GatewayError> {
        self.acknowledge(Method::POST, ASSIGN_PATH, &AssignmentRequest { teacher, subject })
            .await
    }

    /// The backend removes the relation on PUT.
    pub async fn unassign_subject(
        &self,
        teacher: u64,
        subject: u64,
    ) -> Result<ApiMessage, GatewayError> {
        self.acknowledge(Method::PUT, ASSIGN_PATH, &AssignmentRequest { teacher, subject })
            .await
    }

    // ---- timetable ----

    pub async fn get_timetable(
        &self,
        semester: u32,
        grade: Option<&str>,
    ) -> Result<Vec<TimetableEntry>, GatewayError> {
        let mut url = self.endpoint(TIMETABLE_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("semester", &semester.to_string());
            if let Some(grade) = grade {
                pairs.append_pair("grade", grade);
            }
        }
        let request = self.authorize(self.client.get(url), Auth::Bearer)?;
        let body = self.execute(request, Method::GET, TIMETABLE_PATH).await?;
        decode(TIMETABLE_PATH, &body)
    }

    pub async fn add_teacher_and_subject(
        &self,
        assignment: &SlotAssignment,
    ) -> Result<ApiMessage, GatewayError> {
        self.acknowledge(Method::POST, ADD_SLOT_PATH, assignment).await
    }

    pub async fn remove_subject(&self, slot: &SlotRef) -> Result<ApiMessage, GatewayError> {
        self.acknowledge(Method::POST, REMOVE_SUBJECT_PATH, slot).await
    }

    pub async fn remove_teacher(&self, slot: &SlotRef) -> Result<ApiMessage, GatewayError> {
        self.acknowledge(Method::POST, REMOVE_TEACHER_PATH, slot).await
    }

    /// Fills every empty cell of every semester on the backend.
    pub async fn populate_timetable(&self) -> Result<ApiMessage, GatewayError> {
        self.acknowledge_empty(POPULATE_PATH).await
    }

    /// Clears every subject and teacher from every timetable.
    pub async fn remove_all_assignments(&self) -> Result<ApiMessage, GatewayError> {
        self.acknowledge_empty(REMOVE_ALL_PATH).await
    }

    pub async fn get_structure(&self) -> Result<SemesterStructure, GatewayError> {
        self.fetch(Method::GET, STRUCTURE_PATH).await
    }

    // ---- accounts ----

    pub async fn current_user(&self) -> Result<UserDetails, GatewayError> {
        self.fetch(Method::GET, USER_PATH).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, GatewayError> {
        self.submit_anonymous(LOGIN_PATH, credentials).await
    }

    pub async fn admin_login(&self, credentials: &Credentials) -> Result<TokenPair, GatewayError> {
        self.submit_anonymous(ADMIN_LOGIN_PATH, credentials).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<ApiMessage, GatewayError> {
        self.submit_anonymous(REGISTER_PATH, credentials).await
    }

    /// Asks the backend to revoke `refresh`.
    pub async fn logout(&self, refresh: &str) -> Result<ApiMessage, GatewayError> {
        self.acknowledge(
            Method::POST,
            LOGOUT_PATH,
            &serde_json::json!({ "refresh": refresh }),
        )
        .await
    }

    /// Exchanges a refresh token for a new access token.
    pub async fn refresh_access_token(&self, refresh: &str) -> Result<AccessToken, GatewayError> {
        self.submit_anonymous(TOKEN_REFRESH_PATH, &serde_json::json!({ "refresh": refresh }))
            .await
    }

    // ---- plumbing ----

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> Result<RequestBuilder, GatewayError> {
        let url = self.endpoint(path)?;
        self.authorize(self.client.request(method, url), auth)
    }

    fn authorize(&self, builder: RequestBuilder, auth: Auth) -> Result<RequestBuilder, GatewayError> {
        match auth {
            Auth::Anonymous => Ok(builder),
            Auth::Bearer => {
                let token = self
                    .session
                    .access_token()?
                    .ok_or(GatewayError::NotAuthenticated)?;
                Ok(builder.header(AUTHORIZATION, format!("Bearer {token}")))
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, GatewayError> {
        let request = self.request(method.clone(), path, Auth::Bearer)?;
        let body = self.execute(request, method, path).await?;
        decode(path, &body)
    }

    async fn submit<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let request = self.request(method.clone(), path, Auth::Bearer)?.json(body);
        let text = self.execute(request, method, path).await?;
        decode(path, &text)
    }

    async fn submit_anonymous<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let request = self.request(Method::POST, path, Auth::Anonymous)?.json(body);
        let text = self.execute(request, Method::POST, path).await?;
        decode(path, &text)
    }

    async fn acknowledge<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiMessage, GatewayError> {
        let request = self.request(method.clone(), path, Auth::Bearer)?.json(body);
        let text = self.execute(request, method, path).await?;
        decode_ack(path, &text)
    }

    async fn acknowledge_empty(&self, path: &str) -> Result<ApiMessage, GatewayError> {
        let request = self.request(Method::POST, path, Auth::Bearer)?;
        let text = self.execute(request, Method::POST, path).await?;
        decode_ack(path, &text)
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn execute(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<String, GatewayError> {
        let correlation_id = generate_correlation_id();
        let start = Instant::now();

        debug!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            "Sending request"
        );

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    correlation_id = %correlation_id,
                    method = %method,
                    path = %path,
                    error = %e,
                    "Request failed"
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                correlation_id = %correlation_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Backend rejected request"
            );
            return Err(GatewayError::Status {
                path: path.to_string(),
                status,
                body: summarize_body(&body),
            });
        }

        info!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Acknowledgements may come back empty.
fn decode_ack(path: &str, body: &str) -> Result<ApiMessage, GatewayError> {
    if body.trim().is_empty() {
        return Ok(ApiMessage::default());
    }
    decode(path, body)
}

/// Keeps error bodies short enough to log.
fn summarize_body(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= LIMIT {
        return trimmed.to_string();
    }
    let mut short: String = trimmed.chars().take(LIMIT).collect();
    short.push_str("...");
    short
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
