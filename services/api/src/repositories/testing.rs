//! In-memory store and fixtures for repository tests

use common::{
    error::{DatabaseError, DatabaseResult},
    sql::Statement,
    store::{Record, Store},
};
use serde_json::{Value, json};
use sqlx::error::ErrorKind;
use std::{
    borrow::Cow,
    collections::VecDeque,
    error::Error as StdError,
    fmt,
    sync::{Arc, Mutex},
};

use crate::{
    jwt::{self, Principal},
    models::user::Role,
    password,
    repositories::{AdminRepository, EventRequestRepository, UserRepository},
};

/// Store that records executed statements and replays queued results.
///
/// Each executed statement consumes the next queued result set or error;
/// when the queue is empty the statement returns no rows.
#[derive(Default)]
pub struct MockStore {
    responses: Mutex<VecDeque<DatabaseResult<Vec<Value>>>>,
    executed: Mutex<Vec<Statement>>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_rows(&self, rows: Vec<Value>) {
        self.responses.lock().unwrap().push_back(Ok(rows));
    }

    pub fn push_row(&self, row: Value) {
        self.push_rows(vec![row]);
    }

    pub fn push_empty(&self) {
        self.push_rows(Vec::new());
    }

    /// Fail the next statement with `error`
    pub fn push_error(&self, error: DatabaseError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn executed(&self) -> Vec<Statement> {
        self.executed.lock().unwrap().clone()
    }
}

impl Store for MockStore {
    async fn fetch_all<T: Record>(&self, statement: Statement) -> DatabaseResult<Vec<T>> {
        self.executed.lock().unwrap().push(statement);
        let rows = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| DatabaseError::Query(sqlx::Error::Decode(Box::new(e))))
            })
            .collect()
    }
}

/// Database-side rejection of a statement, identified by its SQLSTATE code
#[derive(Debug)]
pub struct Rejection {
    code: &'static str,
    constraint: &'static str,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "violates constraint \"{}\"", self.constraint)
    }
}

impl StdError for Rejection {}

impl sqlx::error::DatabaseError for Rejection {
    fn message(&self) -> &str {
        "constraint violation"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.code))
    }

    fn constraint(&self) -> Option<&str> {
        Some(self.constraint)
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        match self.code {
            "23505" => ErrorKind::UniqueViolation,
            "23503" => ErrorKind::ForeignKeyViolation,
            _ => ErrorKind::Other,
        }
    }
}

fn rejected(code: &'static str, constraint: &'static str) -> DatabaseError {
    DatabaseError::Query(sqlx::Error::database(Rejection { code, constraint }))
}

pub fn unique_violation(constraint: &'static str) -> DatabaseError {
    rejected("23505", constraint)
}

pub fn foreign_key_violation(constraint: &'static str) -> DatabaseError {
    rejected("23503", constraint)
}

pub fn principal(id: &str, role: Role) -> Principal {
    Principal {
        subject_id: id.to_string(),
        role,
    }
}

pub fn user_repository(store: &Arc<MockStore>) -> UserRepository<Arc<MockStore>> {
    UserRepository::new(
        store.clone(),
        password::test_service(),
        jwt::test_service(),
    )
}

pub fn event_request_repository(store: &Arc<MockStore>) -> EventRequestRepository<Arc<MockStore>> {
    EventRequestRepository::new(store.clone())
}

pub fn admin_repository(store: &Arc<MockStore>) -> AdminRepository<Arc<MockStore>> {
    AdminRepository::new(user_repository(store), event_request_repository(store))
}

pub fn user_row(id: &str, role: Role) -> Value {
    json!({
        "userid": id,
        "name": "Jane",
        "email": format!("{}@example.com", id),
        "artistname": "DJ Jane",
        "usertype": role.as_str(),
        "venuename": null,
        "location": null,
    })
}

pub fn user_record_row(id: &str, role: Role, password_hash: &str) -> Value {
    let mut row = user_row(id, role);
    row["password"] = json!(password_hash);
    row
}

pub fn credential_row(id: &str, password_hash: &str) -> Value {
    json!({ "userid": id, "password": password_hash })
}

pub fn event_row(request_id: &str, owner_id: &str) -> Value {
    json!({
        "requestid": request_id,
        "eventid": format!("event-{}", request_id),
        "userid": owner_id,
        "status": "Pending",
        "requestdate": "2024-06-01",
        "starttime": "19:00:00",
        "endtime": "23:00:00",
        "amount": 450.0,
        "artistname": "DJ Jane",
        "eventname": "Summer Night",
    })
}

pub fn owner_row(owner_id: &str) -> Value {
    json!({ "userid": owner_id })
}
