//! # prazo-server
//!
//! HTTP API serving timeline records from the backing spreadsheet.
//!
//! Four endpoints wrap the readers and the update writer in `prazo-core`:
//!
//! | Method & path | Purpose |
//! |---|---|
//! | `GET /api/projects` | project records as positional row arrays |
//! | `GET /api/gantt` | task records as positional row arrays |
//! | `PUT /api/gantt/{task_id}` | update a task's planned start/end |
//! | `PUT /api/projects/{project_id}` | update a project's planned start/end |
//!
//! plus `GET /` as a liveness check. CORS is wide open: the chart front end
//! is served from a different origin.

pub mod config;
pub mod routes;

pub use config::Settings;
pub use routes::{build_router, AppState, SheetNames};
