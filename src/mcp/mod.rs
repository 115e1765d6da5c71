//! MCP (Model Context Protocol) surfaces: tools, resources and prompts.

pub mod prompts;
pub mod resources;
pub mod server;
mod tools;

pub use prompts::{prompt_named, PromptAdapter, PromptTemplate, PROMPTS};
pub use resources::{resource_entries, ResourceAdapter, ResourceEntry};
pub use server::McpServer;
pub use tools::{input_schema, Tool, ToolHandler, ToolRegistry};
