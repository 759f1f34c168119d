//! Single-stream download engine

use crate::extractor::models::StreamVariant;
use crate::utils::error::AppError;
use anyhow::{Context, Result};
use futures::stream::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// What to download and where
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadJob {
    pub stream: StreamVariant,
    /// Video title, used for the file name
    pub title: String,
    /// Destination directory
    pub destination: PathBuf,
}

impl DownloadJob {
    /// Full path of the file this job writes
    pub fn output_path(&self) -> PathBuf {
        let stem = sanitize_filename(&self.title);
        let stem = if stem.trim().is_empty() {
            self.stream.format_id.clone()
        } else {
            stem
        };
        self.destination.join(format!("{}.{}", stem, self.stream.ext))
    }
}

/// Downloads one stream to disk, reporting bytes remaining after every chunk
pub struct DownloadEngine {
    client: Client,
}

impl DownloadEngine {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Write the full stream to `job.output_path()`, replacing any existing file.
    ///
    /// `on_progress` receives the number of bytes still to come. The expected
    /// size is the stream's advertised size, or the response length when the
    /// extractor did not report one.
    pub async fn download<F>(&self, job: &DownloadJob, mut on_progress: F) -> Result<PathBuf>
    where
        F: FnMut(u64) + Send,
    {
        let output_path = job.output_path();
        info!("Downloading {} -> {:?}", job.stream.format_id, output_path);

        tokio::fs::create_dir_all(&job.destination)
            .await
            .with_context(|| format!("Cannot create {:?}", job.destination))?;

        let response = self
            .client
            .get(&job.stream.url)
            .send()
            .await
            .map_err(AppError::from)?;

        if !response.status().is_success() {
            return Err(AppError::DownloadError(format!("HTTP {}", response.status())).into());
        }

        let expected = if job.stream.size > 0 {
            job.stream.size
        } else {
            response.content_length().unwrap_or(0)
        };
        debug!("Expecting {} bytes", expected);

        let downloaded = match write_body(response, &output_path, expected, &mut on_progress).await {
            Ok(downloaded) => downloaded,
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&output_path).await {
                    debug!("No partial file to remove at {:?}: {}", output_path, remove_err);
                }
                return Err(e);
            }
        };

        // The advertised size can be an estimate; the transfer is complete either way
        on_progress(0);
        info!("Finished {:?} ({} bytes)", output_path, downloaded);

        Ok(output_path)
    }
}

async fn write_body<F>(
    response: reqwest::Response,
    output_path: &Path,
    expected: u64,
    on_progress: &mut F,
) -> Result<u64>
where
    F: FnMut(u64) + Send,
{
    let mut file = create_output(output_path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(AppError::from)?;
        file.write_all(&chunk).await.map_err(AppError::from)?;
        downloaded += chunk.len() as u64;
        on_progress(expected.saturating_sub(downloaded));
    }

    file.flush().await.map_err(AppError::from)?;
    Ok(downloaded)
}

async fn create_output(path: &Path) -> Result<File> {
    File::create(path)
        .await
        .with_context(|| format!("Cannot create {:?}", path))
}

/// Sanitize filename for filesystem
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect()
}
