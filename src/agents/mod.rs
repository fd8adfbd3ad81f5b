//! Concrete agent implementations constructed by the roster builder.

pub mod custom;
pub mod executor;
pub mod preset;
pub mod remote;
pub mod retrieval;

pub use custom::CustomAgent;
pub use executor::{CodeExecutorAgent, ExecutorBackend};
pub use preset::{CoderAgent, FileBrowserAgent, WebBrowserAgent};
pub use remote::RemoteToolAgent;
pub use retrieval::RetrievalAgent;
