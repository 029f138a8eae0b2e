//! Prompt payload sent to the text-completion service.

/// A two-message chat prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system:      String,
    pub user:        String,
    pub temperature: f32,
    pub max_tokens:  u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system:      system.into(),
            user:        user.into(),
            temperature: 0.3,
            max_tokens:  200,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
