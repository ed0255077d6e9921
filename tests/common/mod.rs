//! Shared harness: the full router over an in-memory store, a pinned clock
//! and a notifier that records what it was asked to send.

#![allow(dead_code, clippy::panic, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::request::Builder;
use axum::http::{Method, Request, StatusCode};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use babytrack_gateway::api;
use babytrack_gateway::api::extract::AdminKey;
use babytrack_gateway::app_state::AppState;
use babytrack_gateway::domain::{FixedClock, OwnerId};
use babytrack_gateway::error::GatewayError;
use babytrack_gateway::notify::{NotificationSender, ReminderNotice};
use babytrack_gateway::persistence::InMemoryStore;
use babytrack_gateway::service::{
    AdminService, ProfileService, ReminderScheduler, VaccineService,
};

/// Admin bearer token the test router accepts.
pub const ADMIN_KEY: &str = "test-admin-key";

/// Notifier that keeps every notice it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<ReminderNotice>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<ReminderNotice> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, notice: &ReminderNotice) -> Result<(), GatewayError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notice.clone());
        }
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
        panic!("invalid test date {y}-{m}-{d}");
    };
    date
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub clock: FixedClock,
    pub notifier: Arc<RecordingNotifier>,
    pub scheduler: Arc<ReminderScheduler>,
}

impl TestApp {
    pub fn new(today: NaiveDate) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = FixedClock::new(today);
        let notifier = Arc::new(RecordingNotifier::default());

        let vaccines: Arc<InMemoryStore> = Arc::clone(&store);
        let vaccine_service = Arc::new(VaccineService::new(vaccines, Arc::new(clock.clone())));

        let profiles: Arc<InMemoryStore> = Arc::clone(&store);
        let profile_service = Arc::new(ProfileService::new(profiles, Arc::new(clock.clone())));

        let profiles: Arc<InMemoryStore> = Arc::clone(&store);
        let vaccines: Arc<InMemoryStore> = Arc::clone(&store);
        let admin_service = Arc::new(AdminService::new(
            profiles,
            vaccines,
            Arc::new(clock.clone()),
        ));

        let vaccines: Arc<InMemoryStore> = Arc::clone(&store);
        let profiles: Arc<InMemoryStore> = Arc::clone(&store);
        let contacts: Arc<InMemoryStore> = Arc::clone(&store);
        let sender: Arc<RecordingNotifier> = Arc::clone(&notifier);
        let scheduler = Arc::new(ReminderScheduler::new(
            vaccines,
            profiles,
            contacts,
            sender,
            Arc::new(clock.clone()),
        ));

        let router = api::app(AppState {
            vaccine_service,
            profile_service,
            reminder_scheduler: Arc::clone(&scheduler),
            admin_service,
            admin_key: AdminKey::new(Some(ADMIN_KEY.to_string())),
        });

        Self {
            router,
            store,
            clock,
            notifier,
            scheduler,
        }
    }

    /// Sends one request and returns the status and the JSON body
    /// (`Value::Null` for an empty body, a string for non-JSON text).
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        owner: Option<OwnerId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(owner) = owner {
            builder = builder.header("x-owner-id", owner.to_string());
        }
        self.send(builder, body).await
    }

    /// Sends an admin request with `Authorization: Bearer <token>` when a
    /// token is given.
    pub async fn admin_call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        self.send(builder, None).await
    }

    /// Runs one reminder scan through the admin endpoint.
    pub async fn scan(&self) -> Value {
        let (status, body) = self
            .admin_call(Method::POST, "/admin/reminders/scan", Some(ADMIN_KEY))
            .await;
        assert_eq!(status, StatusCode::OK, "scan failed: {body}");
        body
    }

    /// Registers a baby profile with a contact address through the API.
    pub async fn register(&self, owner: OwnerId, baby: &str, email: &str) {
        let (status, body) = self
            .call(
                Method::PUT,
                "/api/v1/profile",
                Some(owner),
                Some(serde_json::json!({
                    "baby_name": baby,
                    "birth_date": "2024-01-05",
                    "gender": "female",
                    "contact_email": email,
                })),
            )
            .await;
        assert!(status.is_success(), "profile registration failed: {body}");
    }

    async fn send(&self, builder: Builder, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        };
        let Ok(request) = request else {
            panic!("request build failed");
        };

        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router call failed");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        if bytes.is_empty() {
            return (status, Value::Null);
        }
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    /// Creates a dose through the API and returns its id.
    pub async fn create(&self, owner: OwnerId, name: &str, due: NaiveDate) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/vaccines",
                Some(owner),
                Some(serde_json::json!({ "vaccine_name": name, "due_date": due })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        let Some(id) = body["id"].as_str() else {
            panic!("created dose has no id: {body}");
        };
        id.to_string()
    }
}
