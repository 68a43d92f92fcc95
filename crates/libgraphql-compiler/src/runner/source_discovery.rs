use crate::config::CompilerConfig;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Every source file under the configured `src` directory, sorted, skipping
/// excluded directories. Entries that cannot be visited are returned
/// alongside.
pub(crate) fn discover_source_paths(config: &CompilerConfig) -> (Vec<PathBuf>, Vec<walkdir::Error>) {
    discover_source_paths_in(config, &config.src_dir())
}

/// Like [`discover_source_paths`], scanning `dir` instead of the whole `src`
/// directory.
pub(crate) fn discover_source_paths_in(
    config: &CompilerConfig,
    dir: &Path,
) -> (Vec<PathBuf>, Vec<walkdir::Error>) {
    tracing::debug!("Scanning `{}` for source documents...", dir.display());

    let mut paths = vec![];
    let mut errors = vec![];
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !config.is_excluded_dir_name(entry.file_name())
        });
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && config.is_source_path(entry.path()) {
                    tracing::trace!("Found source file at {:?}.", entry.path());
                    paths.push(entry.into_path());
                }
            },
            Err(err) => errors.push(err),
        }
    }

    tracing::debug!("Found {} source documents.", paths.len());
    (paths, errors)
}
