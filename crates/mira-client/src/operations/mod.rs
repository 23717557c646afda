//! Operation facades: flows, knowledge datasets, and prompts.
//!
//! Each facade comes in a blocking flavor borrowing a [`Console`](crate::Console)
//! and an async flavor borrowing an [`AsyncConsole`](crate::AsyncConsole). Both
//! build the same [`ApiRequest`](crate::ApiRequest)s.

mod flows;
mod knowledge;
mod prompts;

pub use flows::{AsyncFlowOperations, FlowOperations};
pub use knowledge::{
    check_knowledge_file, AsyncKnowledgeOperations, KnowledgeOperations, KnowledgeSource,
    ALLOWED_EXTENSIONS, MAX_FILE_SIZE,
};
pub use prompts::{AsyncPromptOperations, PromptOperations};
