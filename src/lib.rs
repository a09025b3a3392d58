//! Daily-focus task manager core.
//!
//! [`models::store::TaskStore`] is the single writer of the task list,
//! [`classifier`] splits it into today, backlog and archive views, and
//! [`storage`] keeps it on disk. [`services`] adds the policies a user
//! interface applies on top (daily limit, export, clearing data).

pub mod classifier;
pub mod clock;
pub mod config;
pub mod models;
pub mod services;
pub mod storage;
