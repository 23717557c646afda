use crate::async_console::AsyncConsole;
use crate::config::ClientConfig;
use crate::console::Console;
use crate::error::Result;
use crate::operations::{
    AsyncFlowOperations, AsyncKnowledgeOperations, AsyncPromptOperations, FlowOperations,
    KnowledgeOperations, PromptOperations,
};

/// Blocking entry point to the Mira console
#[derive(Debug, Clone)]
pub struct MiraClient {
    console: Console,
}

impl MiraClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(MiraClient {
            console: Console::new(config)?,
        })
    }

    /// Build a client from `API_KEY` (and `.env`)
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn flow(&self) -> FlowOperations<'_> {
        FlowOperations::new(&self.console)
    }

    pub fn dataset(&self) -> KnowledgeOperations<'_> {
        KnowledgeOperations::new(&self.console)
    }

    pub fn prompt(&self) -> PromptOperations<'_> {
        PromptOperations::new(&self.console)
    }

    pub fn console(&self) -> &Console {
        &self.console
    }
}

/// Async entry point to the Mira console
#[derive(Debug, Clone)]
pub struct AsyncMiraClient {
    console: AsyncConsole,
}

impl AsyncMiraClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(AsyncMiraClient {
            console: AsyncConsole::new(config)?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn flow(&self) -> AsyncFlowOperations<'_> {
        AsyncFlowOperations::new(&self.console)
    }

    pub fn dataset(&self) -> AsyncKnowledgeOperations<'_> {
        AsyncKnowledgeOperations::new(&self.console)
    }

    pub fn prompt(&self) -> AsyncPromptOperations<'_> {
        AsyncPromptOperations::new(&self.console)
    }

    pub fn console(&self) -> &AsyncConsole {
        &self.console
    }
}
