//! Workspace root discovery.

use std::path::PathBuf;

use lsp_types::{InitializeParams, Uri};
use tower_lsp::UriExt;

/// The directory relative target paths are resolved against: the first
/// workspace folder, falling back to the deprecated `rootUri`.
pub fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    #[allow(deprecated)]
    let root_uri = params.root_uri.as_ref();

    let uri = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|f| &f.uri)
        .or(root_uri)?;

    file_uri_to_path(uri)
}

/// Convert a `file:` URI into a filesystem path. Percent escapes are decoded
/// and Windows drive letters (`file:///C:/x`) come back as `C:\x`.
pub fn file_uri_to_path(uri: &Uri) -> Option<PathBuf> {
    uri.to_file_path().map(|path| path.into_owned())
}
