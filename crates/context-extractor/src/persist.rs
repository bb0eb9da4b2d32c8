// This file is part of cursor-context-save.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0

//! Writing the captured text to the configured file.
//!
//! # How it works
//!
//! 1. Capture the text (selection or cursor context)
//! 2. Resolve `filePath` against the workspace root
//! 3. Create missing parent directories
//! 4. Overwrite the target with the UTF-8 text
//!
//! There is no locking: two saves racing on the same path leave whichever
//! write finished last.

use std::path::{Component, Path, PathBuf};

use lsp_types::Range;

use crate::config::SaveConfig;
use crate::document::TextSource;
use crate::error::SaveError;
use crate::extract::{capture, CaptureSource};
use crate::selection::Selection;

/// A snapshot that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSnapshot {
    /// Resolved target path.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: usize,
    pub source: CaptureSource,
    /// Range the text was taken from, if the document had any lines.
    pub range: Option<Range>,
}

/// Resolve the configured target path.
///
/// Absolute paths are kept; relative ones are joined onto `workspace_root`
/// (or left relative to the working directory when there is no root).
/// `.` and `..` components are folded away.
pub fn resolve_target(file_path: &str, workspace_root: Option<&Path>) -> Result<PathBuf, SaveError> {
    let file_path = file_path.trim();
    if file_path.is_empty() {
        return Err(SaveError::EmptyTargetPath);
    }

    let path = Path::new(file_path);
    let joined = match workspace_root {
        Some(root) if !path.is_absolute() => root.join(path),
        _ => path.to_path_buf(),
    };

    Ok(normalize_path(&joined))
}

/// Normalize a path by resolving `..` and `.` without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Overwrite `path` with `text`, creating parent directories as needed.
pub async fn write_snapshot(path: &Path, text: &str) -> Result<(), SaveError> {
    let write_error = |source: std::io::Error| SaveError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
    }

    tokio::fs::write(path, text.as_bytes()).await.map_err(write_error)?;

    tracing::debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Capture the text for `selection` and write it to the configured file.
pub async fn save_context<D: TextSource + Sync + ?Sized>(
    document: &D,
    selection: &Selection,
    config: &SaveConfig,
    workspace_root: Option<&Path>,
) -> Result<SavedSnapshot, SaveError> {
    let captured = capture(document, selection, config.context_lines);
    let path = resolve_target(&config.file_path, workspace_root)?;

    write_snapshot(&path, &captured.text).await?;

    tracing::info!(
        "Saved {:?} ({} bytes) to {}",
        captured.source,
        captured.text.len(),
        path.display()
    );

    Ok(SavedSnapshot {
        path,
        bytes: captured.text.len(),
        source: captured.source,
        range: captured.range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::Position;
    use ropey::Rope;

    fn pos(line: u32, character: u32) -> Position {
        Position { line, character }
    }

    #[test]
    fn test_relative_path_joins_workspace_root() {
        let path = resolve_target("notes/ctx.txt", Some(Path::new("/work/project"))).unwrap();
        assert_eq!(path, PathBuf::from("/work/project/notes/ctx.txt"));
    }

    #[test]
    fn test_absolute_path_ignores_root() {
        let path = resolve_target("/tmp/ctx.txt", Some(Path::new("/work/project"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/ctx.txt"));
    }

    #[test]
    fn test_relative_path_without_root() {
        let path = resolve_target("./out/ctx.txt", None).unwrap();
        assert_eq!(path, PathBuf::from("out/ctx.txt"));
    }

    #[test]
    fn test_parent_components_are_folded() {
        let path = resolve_target("../shared/./ctx.txt", Some(Path::new("/work/project"))).unwrap();
        assert_eq!(path, PathBuf::from("/work/shared/ctx.txt"));

        let path = resolve_target("../../ctx.txt", None).unwrap();
        assert_eq!(path, PathBuf::from("../../ctx.txt"));

        let path = resolve_target("/../ctx.txt", None).unwrap();
        assert_eq!(path, PathBuf::from("/ctx.txt"));
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            resolve_target("  ", Some(Path::new("/work"))),
            Err(SaveError::EmptyTargetPath)
        ));
    }

    #[tokio::test]
    async fn test_save_context_writes_window() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Rope::from_str("a\nb\nc\nd\ne");
        let config = SaveConfig {
            file_path: "ctx.txt".to_string(),
            context_lines: 1,
        };

        let saved = save_context(&doc, &Selection::cursor(pos(2, 0)), &config, Some(dir.path()))
            .await
            .unwrap();

        assert_eq!(saved.path, dir.path().join("ctx.txt"));
        assert_eq!(saved.bytes, 5);
        assert_eq!(saved.source, CaptureSource::Context);
        assert_eq!(std::fs::read_to_string(&saved.path).unwrap(), "b\nc\nd");
    }

    #[tokio::test]
    async fn test_save_context_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Rope::from_str("first line\nsecond line");
        let config = SaveConfig {
            file_path: "ctx.txt".to_string(),
            context_lines: 10,
        };

        save_context(&doc, &Selection::cursor(pos(0, 0)), &config, Some(dir.path()))
            .await
            .unwrap();
        let selection = Selection::new(pos(1, 0), pos(1, 6));
        let saved = save_context(&doc, &selection, &config, Some(dir.path()))
            .await
            .unwrap();

        assert_eq!(saved.source, CaptureSource::Selection);
        assert_eq!(std::fs::read_to_string(&saved.path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/ctx.txt");

        write_snapshot(&target, "héllo").await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), "héllo".as_bytes());
    }

    #[tokio::test]
    async fn test_write_to_directory_fails() {
        let dir = tempfile::tempdir().unwrap();

        let err = write_snapshot(dir.path(), "text").await.unwrap_err();

        match err {
            SaveError::Write { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
