//! Externally-injected collaborators for authentication and consent.
//!
//! The session treats credential acquisition and consent as opaque
//! capabilities so the core can be exercised without a real identity stack.

use async_trait::async_trait;

/// Produces the bearer credential attached to each invocation.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a bearer token, or `None` when no credential is available.
    ///
    /// Called once per submission; implementations are free to cache or
    /// refresh internally.
    async fn access_token(&self) -> Option<String>;
}

/// A fixed token, useful for tests and short-lived tools.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Creates a provider that always returns the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Creates a provider backed by the named environment variable.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenProvider for EnvToken {
    async fn access_token(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|t| !t.is_empty())
    }
}

/// Gates submissions on user consent.
///
/// How consent is obtained and persisted is the embedder's concern; the
/// session only asks whether it is currently granted.
pub trait ConsentGate: Send + Sync {
    /// Returns true if the user has consented to sending prompts.
    fn is_granted(&self) -> bool;
}

/// A gate that is always open.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

impl ConsentGate for AlwaysGranted {
    fn is_granted(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_always_available() {
        let provider = StaticToken::new("abc123");
        assert_eq!(provider.access_token().await.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn env_token_absent_when_unset() {
        let provider = EnvToken::new("AGENTCHAT_TEST_TOKEN_UNSET_VAR");
        assert_eq!(provider.access_token().await, None);
    }

    #[test]
    fn always_granted() {
        assert!(AlwaysGranted.is_granted());
    }
}
