//! LLM 层：网关抽象与实现（Groq / Mock）

pub mod groq;
pub mod mock;
pub mod traits;

pub use groq::GroqClient;
pub use mock::MockGatewayClient;
pub use traits::{GatewayClient, GatewayError};
