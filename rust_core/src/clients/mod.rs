pub mod anthropic;

#[cfg(test)]
pub(crate) mod test_server;

// Re-export commonly used types
pub use anthropic::{AnthropicClient, AnthropicConfig};
