// ABOUTME: Configuration management module
// ABOUTME: Environment-based runtime configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

/// Environment variable based configuration
pub mod environment;
