//! Utility functions
//!
use std::{
    fs::File,
    io::Cursor,
    path::{Path, PathBuf},
};

use reqwest::Client;

use crate::{hashed, BoxError};

/// Name of the per-user cache directory for downloaded resources.
const CACHE_DIR_NAME: &str = "cam_classify";

/// Whether a resource descriptor points to the network.
pub fn is_url(descriptor: &str) -> bool {
    descriptor.starts_with("http://") || descriptor.starts_with("https://")
}

/// Turn a resource descriptor into a local file path.
///
/// Local paths are returned as they are once they exist. URLs are downloaded into the
/// cache directory on first use and served from there afterwards.
pub async fn resolve_resource(client: &Client, descriptor: &str) -> Result<PathBuf, BoxError> {
    if !is_url(descriptor) {
        let path = PathBuf::from(descriptor);
        if !tokio::fs::try_exists(&path).await? {
            return Err(format!("{} does not exist", path.display()).into());
        }
        return Ok(path);
    }

    let dir = cache_dir();
    tokio::fs::create_dir_all(&dir).await?;

    let filepath = dir.join(cached_file_name(descriptor));
    if tokio::fs::try_exists(&filepath).await? {
        log::debug!("Using cached {} for {}", filepath.display(), descriptor);
    } else {
        log::info!("Downloading {} to {}", descriptor, filepath.display());
        download_file(client, descriptor, &filepath).await?;
    }

    Ok(filepath)
}

/// Download a file from a URL to a given filepath.
///
/// The content lands in a temporary sibling first so an interrupted download never
/// leaves a truncated file behind.
pub async fn download_file(
    client: &Client,
    url: &str,
    filepath: impl AsRef<Path>,
) -> Result<(), BoxError> {
    let filepath = filepath.as_ref();
    let resp = client.get(url).send().await?.error_for_status()?;

    let partial = filepath.with_extension("part");
    {
        let mut file = File::create(&partial)?;
        let mut content = Cursor::new(resp.bytes().await?);
        std::io::copy(&mut content, &mut file)?;
    }
    std::fs::rename(&partial, filepath)?;

    Ok(())
}

fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_DIR_NAME)
}

/// Cache file name keeping the URL's last path segment readable.
fn cached_file_name(url: &str) -> String {
    let last = url
        .split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').find(|segment| !segment.is_empty()))
        .unwrap_or("resource");

    format!("{:016x}-{}", hashed(url), last)
}
