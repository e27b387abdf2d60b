//! Test module for dpad-core
//!
//! This module contains tests for:
//! - App list loading, hide/rename and the visible-row projection
//! - Preference persistence round trips through the JSON file backend
//! - Desktop entry scanning and launch intent resolution
//! - Launch outcomes
//! - Configuration loading and defaults

mod registry_tests;
