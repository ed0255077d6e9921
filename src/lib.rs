//! # babytrack-gateway
//!
//! REST gateway and reminder service for a baby's vaccine schedule.
//!
//! The gateway stores scheduled doses and a baby profile per owner, derives
//! each dose's display status (pending, due today, overdue, completed) from
//! the current date, schedules the follow-up dose one calendar month after
//! a completion, and periodically emails a single reminder for every
//! pending dose due within the next few days.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, behind an authenticating proxy)    Operators (admin bearer token)
//!     │                                                  │
//!     ├── REST Handlers (api/) ──────────────────────────┘
//!     │
//!     ├── VaccineService / ProfileService (service/)   ReminderScheduler / AdminService (service/)
//!     │        │                                              │      │
//!     │        └──────────── domain rules (domain/) ──────────┘      └── NotificationSender (notify/)
//!     │
//!     └── VaccineStore / ProfileStore / ProfileResolver / ContactResolver (persistence/)
//!              ├── PostgreSQL
//!              └── in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod service;
