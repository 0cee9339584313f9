//! Language-model adapters

mod openai;
mod wire;

pub use openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiGateway, OpenAiSession};
