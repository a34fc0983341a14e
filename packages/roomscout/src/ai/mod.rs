//! Model-backend implementations (feature-gated).

mod openai;

pub use openai::OpenAI;
