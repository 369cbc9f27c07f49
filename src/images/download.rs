// src/images/download.rs
// =============================================================================
// Downloads every collected image into one folder.
//
// For each image, in collection order:
// 1. Skip it if a file with the same name is already there (never overwrite)
// 2. Fetch the bytes; a failed fetch is logged and skipped
// 3. Skip it if the server did not declare a size, or declared a tiny one
//    (tracking pixels, broken placeholders)
// 4. Write the file
// 5. Hash the written file; if the same content was already written under
//    another name, delete the new copy
//
// Nothing in here aborts the run except failing to prepare the folder.
//
// Rust concepts:
// - HashSet: the checksums seen so far
// - Serialize: the report can be printed as JSON
// =============================================================================

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::directory::{clear_dir, ensure_dir};
use super::naming::ImageRecord;
use crate::config::DownloadConfig;
use crate::fetch::Fetcher;

/// Content hashes of the files written during one run.
#[derive(Debug, Clone, Default)]
pub struct ChecksumSet {
    seen: HashSet<String>,
}

impl ChecksumSet {
    /// Record a checksum. Returns false if it was already present.
    pub fn insert(&mut self, checksum: String) -> bool {
        self.seen.insert(checksum)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// What happened to the images of one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadReport {
    /// Files kept on disk at the end of the run
    pub written: usize,
    pub skipped_existing: usize,
    pub fetch_failed: usize,
    pub too_small: usize,
    pub duplicates: usize,
    pub write_failed: usize,
    /// Names of the kept files, in download order
    pub files: Vec<String>,
}

enum Outcome {
    Kept,
    Existing,
    FetchFailed,
    TooSmall,
    Duplicate,
    WriteFailed,
}

pub struct Downloader<'a> {
    fetcher: &'a Fetcher,
    folder: PathBuf,
    min_image_bytes: u64,
    checksums: ChecksumSet,
}

impl<'a> Downloader<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &DownloadConfig) -> Self {
        Self {
            fetcher,
            folder: config.folder.clone(),
            min_image_bytes: config.min_image_bytes,
            checksums: ChecksumSet::default(),
        }
    }

    pub fn checksums(&self) -> &ChecksumSet {
        &self.checksums
    }

    /// Create the target folder if needed and delete the files already in it.
    ///
    /// This wipes the downloads of any earlier run.
    pub fn prepare(&self) -> io::Result<()> {
        ensure_dir(&self.folder)?;
        let removed = clear_dir(&self.folder)?;
        if removed > 0 {
            info!("Cleared {} old file(s) from {}", removed, self.folder.display());
        }
        Ok(())
    }

    /// Download `images` one after another.
    pub async fn download_all(&mut self, images: &[ImageRecord]) -> DownloadReport {
        info!("Pictures to download: {}", images.len());

        let mut report = DownloadReport::default();
        for image in images {
            match self.download_one(image).await {
                Outcome::Kept => {
                    report.written += 1;
                    report.files.push(image.file_name.clone());
                }
                Outcome::Existing => report.skipped_existing += 1,
                Outcome::FetchFailed => report.fetch_failed += 1,
                Outcome::TooSmall => report.too_small += 1,
                Outcome::Duplicate => report.duplicates += 1,
                Outcome::WriteFailed => report.write_failed += 1,
            }
        }

        info!(
            "Downloaded {} image(s) into {}",
            report.written,
            self.folder.display()
        );
        report
    }

    async fn download_one(&mut self, image: &ImageRecord) -> Outcome {
        let target = self.folder.join(&image.file_name);

        if target.exists() {
            warn!("{} already exists, not overwriting", target.display());
            return Outcome::Existing;
        }

        let fetched = match self.fetcher.fetch_bytes(&image.url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Image unable to download: {e}");
                return Outcome::FetchFailed;
            }
        };

        // Fail closed: no declared size means we cannot judge the image
        match fetched.declared_len {
            Some(len) if len > self.min_image_bytes => {}
            Some(len) => {
                debug!("Skipping {} ({} bytes is too small)", image.url, len);
                return Outcome::TooSmall;
            }
            None => {
                debug!("Skipping {} (no Content-Length)", image.url);
                return Outcome::TooSmall;
            }
        }

        if let Err(e) = fs::write(&target, &fetched.bytes) {
            warn!("Image unable to write to {}: {}", target.display(), e);
            return Outcome::WriteFailed;
        }

        let checksum = match checksum_file(&target) {
            Ok(checksum) => checksum,
            Err(e) => {
                warn!("Could not hash {}: {}", target.display(), e);
                // An unhashable file cannot be deduplicated; do not keep it
                if let Err(e) = fs::remove_file(&target) {
                    warn!("Could not remove unhashed {}: {}", target.display(), e);
                }
                return Outcome::WriteFailed;
            }
        };

        if !self.checksums.insert(checksum) {
            debug!("{} duplicates an earlier image, removing", image.file_name);
            if let Err(e) = fs::remove_file(&target) {
                warn!("Could not remove duplicate {}: {}", target.display(), e);
            }
            return Outcome::Duplicate;
        }

        debug!("Wrote {}", target.display());
        Outcome::Kept
    }
}

/// SHA-256 of a file's bytes, hex encoded.
pub fn checksum_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is the 'a in Downloader<'a>?
//    - A lifetime: the downloader borrows the Fetcher instead of owning it
//    - The compiler checks the Fetcher outlives the Downloader
//
// 2. Why hash the file after writing it?
//    - Two different URLs (and names) can serve the very same picture
//    - Equal SHA-256 hashes mean equal bytes, so the second copy is removed
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve_bytes(server: &MockServer, route: &str, bytes: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
            .mount(server)
            .await;
    }

    fn record(server: &MockServer, route: &str, alt: &str) -> ImageRecord {
        ImageRecord::new(format!("{}{}", server.uri(), route), alt, None)
    }

    fn config(folder: &Path) -> DownloadConfig {
        DownloadConfig {
            folder: folder.to_path_buf(),
            min_image_bytes: 100,
        }
    }

    #[tokio::test]
    async fn test_writes_images_and_drops_duplicate_content() {
        let server = MockServer::start().await;
        serve_bytes(&server, "/a.png", vec![1u8; 500]).await;
        serve_bytes(&server, "/b.png", vec![1u8; 500]).await;
        serve_bytes(&server, "/c.png", vec![2u8; 500]).await;

        let tmp = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let mut downloader = Downloader::new(&fetcher, &config(tmp.path()));
        downloader.prepare().unwrap();

        let images = vec![
            record(&server, "/a.png", "First"),
            record(&server, "/b.png", "Second"),
            record(&server, "/c.png", "Third"),
        ];
        let report = downloader.download_all(&images).await;

        assert_eq!(report.written, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.files, vec!["First.jpeg", "Third.jpeg"]);
        assert!(tmp.path().join("First.jpeg").exists());
        assert!(!tmp.path().join("Second.jpeg").exists());
        assert!(tmp.path().join("Third.jpeg").exists());
        // One checksum per distinct content
        assert_eq!(downloader.checksums().len(), 2);
    }

    #[tokio::test]
    async fn test_skips_tiny_images() {
        let server = MockServer::start().await;
        serve_bytes(&server, "/pixel.gif", vec![0u8; 43]).await;
        serve_bytes(&server, "/edge.png", vec![0u8; 100]).await;

        let tmp = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let mut downloader = Downloader::new(&fetcher, &config(tmp.path()));

        let images = vec![
            record(&server, "/pixel.gif", "Pixel"),
            record(&server, "/edge.png", "Edge"),
        ];
        let report = downloader.download_all(&images).await;

        assert_eq!(report.written, 0);
        assert_eq!(report.too_small, 2);
        assert!(downloader.checksums().is_empty());
    }

    // Answers one request with a body but no Content-Length header;
    // the end of the body is marked by closing the connection.
    fn serve_without_length(body: Vec<u8>) -> String {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nConnection: close\r\n\r\n")
                .unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{addr}/big.png")
    }

    #[tokio::test]
    async fn test_skips_images_without_declared_size() {
        let url = serve_without_length(vec![3u8; 5000]);

        let tmp = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let mut downloader = Downloader::new(&fetcher, &config(tmp.path()));

        let report = downloader
            .download_all(&[ImageRecord::new(url, "Big", None)])
            .await;

        assert_eq!(report.too_small, 1);
        assert_eq!(report.written, 0);
        assert_eq!(report.fetch_failed, 0);
        assert!(!tmp.path().join("Big.jpeg").exists());
        assert!(downloader.checksums().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        serve_bytes(&server, "/ok.png", vec![9u8; 300]).await;

        let tmp = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let mut downloader = Downloader::new(&fetcher, &config(tmp.path()));

        let images = vec![
            record(&server, "/missing.png", "Missing"),
            record(&server, "/ok.png", "Fine"),
        ];
        let report = downloader.download_all(&images).await;

        assert_eq!(report.fetch_failed, 1);
        assert_eq!(report.written, 1);
    }

    #[tokio::test]
    async fn test_never_overwrites_existing_file() {
        let server = MockServer::start().await;
        serve_bytes(&server, "/a.png", vec![5u8; 400]).await;

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Kept.jpeg"), b"original").unwrap();

        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let mut downloader = Downloader::new(&fetcher, &config(tmp.path()));
        let report = downloader
            .download_all(&[record(&server, "/a.png", "Kept")])
            .await;

        assert_eq!(report.skipped_existing, 1);
        assert_eq!(fs::read(tmp.path().join("Kept.jpeg")).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_prepare_clears_previous_run() {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().join("images");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("old.jpeg"), b"old").unwrap();

        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let downloader = Downloader::new(&fetcher, &config(&folder));
        downloader.prepare().unwrap();

        assert!(folder.is_dir());
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 0);
    }

    #[test]
    fn test_checksum_matches_content() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        let sum = checksum_file(&a).unwrap();
        assert_eq!(sum, checksum_file(&b).unwrap());
        assert_eq!(sum.len(), 64);

        let mut set = ChecksumSet::default();
        assert!(set.insert(sum.clone()));
        assert!(!set.insert(sum));
        assert_eq!(set.len(), 1);
    }
}
