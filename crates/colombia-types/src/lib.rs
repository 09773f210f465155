pub mod api;
pub mod models;

/// Every session token issued by the mock auth routes starts with this.
pub const TOKEN_PREFIX: &str = "mock_token_";
