//! hitcounter - hit (view) tracking for database entities
//!
//! Records visits to any host entity with bot filtering and per-IP cooldown
//! deduplication, and answers aggregate queries (totals, unique visitors,
//! calendar windows, popular/trending rankings).
//!
//! # Features
//! - **cli**: `hitcounter` maintenance binary (default)
//!
//! # Architecture
//! - `hits`: Recording pipeline, per-entity tracker, scopes, rankings, retention
//! - `storage`: SeaORM hit record store (SQLite, MySQL, PostgreSQL)
//! - `config`: Configuration management (TOML + `HC__*` environment)
//! - `errors`: Crate error type
//! - `interfaces`: Command-line interface
//! - `system`: Logging initialization
//! - `utils`: Client IP resolution, calendar windows, date parsing

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod hits;
pub mod interfaces;
pub mod storage;
pub mod system;
pub mod utils;

pub use errors::{HitError, Result};
pub use hits::{
    HitOverrides, HitRecorder, HitScope, HitService, HitTracker, Hittable, HittableKind,
    HittableRef, VisitContext,
};
pub use storage::{HitRecord, RankedEntity};
