// This file is part of cursor-context-save.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0

//! Context Extractor - the core of cursor-context-save
//!
//! This crate provides:
//! - Document access: a narrow `TextSource` trait over line-indexed text
//! - Extraction: the selection or a window of lines around the cursor
//! - Configuration: the `cursorContextSave` settings section
//! - Persistence: resolving the target path and writing the snapshot

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod persist;
pub mod selection;

pub use config::{SaveConfig, SaveConfigUpdate, CONFIG_SECTION};
pub use document::{position_to_char, TextSource};
pub use error::{ConfigError, SaveError};
pub use extract::{capture, extract, Capture, CaptureSource, ContextWindow};
pub use persist::{resolve_target, save_context, write_snapshot, SavedSnapshot};
pub use selection::Selection;
