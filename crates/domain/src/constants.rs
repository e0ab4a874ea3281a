//! Application constants
//!
//! Centralized location for domain-level constants shared across crates.

// Configuration defaults
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";
pub const DEFAULT_TOKEN_PATH: &str = "token.json";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

// Oracle provider tags accepted by the factory
pub const PROVIDER_ANTHROPIC: &str = "anthropic";
pub const PROVIDER_OPENAI: &str = "openai";

// Completion budgets for the two oracle call shapes
pub const EXTRACTION_MAX_TOKENS: u32 = 4096;
pub const DEDUP_MAX_TOKENS: u32 = 256;
