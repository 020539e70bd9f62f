// ABOUTME: Application constants and configuration defaults
// ABOUTME: Environment variable names, default values, and limits in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

/// Environment variable names
pub mod env_config {
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Log level override (error, warn, info, debug, trace)
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Default configuration values
pub mod defaults {
    /// Default database URL when none configured
    pub const DATABASE_URL: &str = "sqlite:./data/recipes.db";
    /// Default log level
    pub const LOG_LEVEL: &str = "info";
}

/// Application limits
pub mod limits {
    /// Length of generated recipe slugs
    pub const SLUG_LENGTH: usize = 10;
    /// Maximum ingredient/step entries accepted in a single reconciliation
    pub const MAX_LIST_ENTRIES: usize = 500;
}
