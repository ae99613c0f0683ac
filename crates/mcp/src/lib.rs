pub mod error;
pub mod server;
pub mod types;

pub use error::to_mcp_error;
pub use server::LemonadeStandServer;
pub use types::{McpRequest, McpResponse};
