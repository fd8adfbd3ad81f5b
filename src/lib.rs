//! # troupe
//!
//! Session layer for multi-agent orchestration: builds agent rosters from
//! declarative specs, adapts them to a pluggable orchestration engine,
//! normalizes the engine's event stream onto a stable wire schema, and
//! persists transcripts as they flow.
//!
//! The typical pipeline:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use troupe::prelude::*;
//! # async fn run(engine: Arc<dyn OrchestrationEngine>, client: ClientHandle) -> Result<()> {
//! let config = TroupeConfig::from_env();
//! let session = Arc::new(Session::new(generate_session_name(), "user-1"));
//! let builder = RosterBuilder::new(client, "/tmp/work").with_config(config.clone());
//! session.initialize(&builder, &default_roster()).await?;
//!
//! let registry = SessionRegistry::new();
//! let store = Arc::new(JsonlStore::new(&config.logs_dir));
//! let normalizer = Normalizer::new(session.id(), session.user_id(), store)
//!     .with_roster(session.specs());
//!
//! let _stream = stream_session(
//!     session,
//!     engine,
//!     registry,
//!     normalizer,
//!     "Summarize the latest results".to_string(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod agents;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod prelude;
pub mod roster;
pub mod session;
pub mod store;
pub mod stream;
pub mod types;

pub use error::{Result, TroupeError};
