use std::path::{Path, PathBuf};

use wde_logger::{debug, info};

use crate::LoadError;

/// Whether a resource source designates a remote location.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Resolve a local resource path.
/// Relative paths are relative to the directory of the executable.
pub fn resolve_path(source: &str) -> PathBuf {
    let path = Path::new(source);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    match std::env::current_exe() {
        Ok(exe) => match exe.parent() {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Fetch the content of a resource, either over HTTP(S) or from the file system.
///
/// # Arguments
///
/// * `source` - URL or file path of the resource.
///
/// # Errors
///
/// * `LoadError::Fetch` - The request failed or the server answered with an error status.
/// * `LoadError::Io` - The file cannot be read.
#[tracing::instrument]
pub async fn fetch_bytes(source: &str) -> Result<Vec<u8>, LoadError> {
    if is_remote(source) {
        info!(source, "Downloading resource.");
        let fetch_error = |error| LoadError::Fetch { location: source.to_string(), error };

        let response = reqwest::get(source).await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?;
        let bytes = response.bytes().await.map_err(fetch_error)?;

        debug!(source, size = bytes.len(), "Downloaded resource.");
        return Ok(bytes.to_vec());
    }

    let path = resolve_path(source);
    debug!(path = ?path, "Reading resource file.");
    tokio::fs::read(&path).await.map_err(|error| LoadError::Io {
        location: path.display().to_string(),
        error,
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_remote_sources() {
        assert!(is_remote("https://example.org/dem.tif"));
        assert!(is_remote("http://localhost:8000/dem.tif"));
        assert!(!is_remote("res/dem.tif"));
        assert!(!is_remote("/data/dem.tif"));
    }

    #[test]
    fn keeps_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("dem.tif");
        assert_eq!(resolve_path(file.to_str().unwrap()), file);
    }

    #[test]
    fn resolves_relative_paths_next_to_executable() {
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(resolve_path("res/config.json"), exe_dir.join("res/config.json"));
    }

    #[tokio::test]
    async fn reads_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.bin");
        std::fs::write(&file, [1u8, 2, 3]).unwrap();

        let bytes = fetch_bytes(file.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.tif");

        let res = fetch_bytes(file.to_str().unwrap()).await;
        assert!(matches!(res, Err(LoadError::Io { .. })));
    }
}
