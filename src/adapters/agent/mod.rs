//! External strategy-generator adapter (LLM backend).

pub mod external;

pub use external::{AgentConfig, ExternalGenerator};
