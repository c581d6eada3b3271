//! Client archive download and extraction
//!
//! Downloads are exposed as a [`Download`] session that is advanced in small
//! steps, so a UI thread can hand control back to its event loop between
//! chunks. The archive is written to a temporary file inside the install
//! directory which is deleted on drop, so an aborted download never leaves a
//! partial archive behind.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use reqwest::blocking::{Client, Response};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use super::version::VersionMarker;
use crate::constants::remote::VERSION_PLACEHOLDER;
use crate::constants::update::{CHUNKS_PER_FRAME, CHUNK_SIZE, TEMP_PREFIX};
use crate::error::{LauncherError, Result};

/// Bytes received so far and the announced total, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub downloaded: u64,
    pub total: Option<u64>,
}

impl Progress {
    /// Completed fraction in 0.0..=1.0, None when the server sent no length
    pub fn fraction(&self) -> Option<f32> {
        match self.total {
            Some(0) => Some(1.0),
            Some(total) => Some((self.downloaded as f64 / total as f64).min(1.0) as f32),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Pending(Progress),
    Complete(Progress),
}

/// An archive download in progress
pub struct Download {
    version: String,
    response: Response,
    archive: NamedTempFile,
    progress: Progress,
    complete: bool,
}

impl Download {
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Read up to `max_chunks` chunks from the response into the archive file
    pub fn step(&mut self, max_chunks: usize) -> Result<Step> {
        if self.complete {
            return Ok(Step::Complete(self.progress));
        }

        let mut buf = [0u8; CHUNK_SIZE];
        for _ in 0..max_chunks {
            let read = match self.response.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(LauncherError::Interrupted(e)),
            };

            if read == 0 {
                if let Some(total) = self.progress.total
                    && self.progress.downloaded < total
                {
                    return Err(LauncherError::Interrupted(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "received {} of {} bytes",
                            self.progress.downloaded, total
                        ),
                    )));
                }
                self.complete = true;
                return Ok(Step::Complete(self.progress));
            }

            self.archive
                .write_all(&buf[..read])
                .map_err(|e| LauncherError::io(self.archive.path(), e))?;
            self.progress.downloaded += read as u64;
        }

        Ok(Step::Pending(self.progress))
    }
}

/// Final state of an install attempt
#[derive(Debug)]
pub enum InstallOutcome {
    Ok { version: String },
    DownloadFailed(LauncherError),
    /// The version marker is left untouched so the next run retries
    ExtractFailed(LauncherError),
}

pub struct UpdateInstaller {
    client: Client,
    archive_url: String,
    install_dir: PathBuf,
    marker: VersionMarker,
}

impl UpdateInstaller {
    /// `archive_url` must contain the `{version}` placeholder
    pub fn new(
        client: Client,
        archive_url: String,
        install_dir: PathBuf,
        marker: VersionMarker,
    ) -> Self {
        Self {
            client,
            archive_url,
            install_dir,
            marker,
        }
    }

    /// Archive URL for a given version token
    pub fn url_for(&self, version: &str) -> String {
        self.archive_url.replace(VERSION_PLACEHOLDER, version)
    }

    /// Open the archive stream for `version`
    pub fn begin(&self, version: &str) -> Result<Download> {
        let url = self.url_for(version);
        info!(%url, %version, "Downloading client archive");

        let response = self.client.get(&url).send()?.error_for_status()?;
        let total = response.content_length();

        fs::create_dir_all(&self.install_dir)
            .map_err(|e| LauncherError::io(&self.install_dir, e))?;
        let archive = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".zip")
            .tempfile_in(&self.install_dir)
            .map_err(|e| LauncherError::io(&self.install_dir, e))?;

        debug!(path = ?archive.path(), total = ?total, "Opened download");
        Ok(Download {
            version: version.to_string(),
            response,
            archive,
            progress: Progress {
                downloaded: 0,
                total,
            },
            complete: false,
        })
    }

    /// Extract a fully downloaded archive and record its version
    pub fn finish(&self, mut download: Download) -> InstallOutcome {
        if !download.complete {
            return InstallOutcome::DownloadFailed(LauncherError::Interrupted(io::Error::other(
                "download finished before the stream ended",
            )));
        }

        if let Err(e) = download.archive.flush() {
            return InstallOutcome::DownloadFailed(LauncherError::io(download.archive.path(), e));
        }

        let result = download
            .archive
            .reopen()
            .map_err(|e| LauncherError::io(download.archive.path(), e))
            .and_then(|file| extract_archive(file, &self.install_dir))
            .and_then(|count| {
                self.marker.write(&download.version)?;
                Ok(count)
            });

        // Dropping the session removes the temporary archive
        let Download { version, .. } = download;

        match result {
            Ok(count) => {
                info!(%version, files = count, "Client updated");
                InstallOutcome::Ok { version }
            }
            Err(err) => {
                error!(%version, error = %err, "Failed to install client archive");
                InstallOutcome::ExtractFailed(err)
            }
        }
    }

    /// Download and install `version` in one blocking call
    pub fn install(&self, version: &str, mut on_progress: impl FnMut(Progress)) -> InstallOutcome {
        let mut download = match self.begin(version) {
            Ok(download) => download,
            Err(err) => return InstallOutcome::DownloadFailed(err),
        };

        loop {
            match download.step(CHUNKS_PER_FRAME) {
                Ok(Step::Pending(progress)) => on_progress(progress),
                Ok(Step::Complete(progress)) => {
                    on_progress(progress);
                    break;
                }
                Err(err) => {
                    error!(%version, error = %err, "Download failed");
                    return InstallOutcome::DownloadFailed(err);
                }
            }
        }

        self.finish(download)
    }
}

/// Extract every entry of a zip archive below `root`, overwriting existing
/// files. Returns the number of files written.
pub fn extract_archive(file: File, root: &Path) -> Result<usize> {
    let mut archive = zip::ZipArchive::new(file)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let relative = entry
            .enclosed_name()
            .ok_or_else(|| LauncherError::Archive(format!("unsafe entry path: {}", entry.name())))?;
        let out_path = root.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| LauncherError::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }

        let mut out = File::create(&out_path).map_err(|e| LauncherError::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| {
            // Decompression errors surface through Read
            LauncherError::Archive(format!("{}: {}", entry.name(), e))
        })?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                .map_err(|e| LauncherError::io(&out_path, e))?;
        }

        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use std::io::Cursor;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    fn installer(server: &mockito::Server, dir: &tempfile::TempDir) -> UpdateInstaller {
        UpdateInstaller::new(
            Client::new(),
            format!("{}/client/{{version}}_client.zip", server.url()),
            dir.path().join("client"),
            VersionMarker::new(dir.path().join("settings").join("version.json")),
        )
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
                    .count()
            })
            .unwrap_or(0)
    }

    #[test]
    fn test_archive_url_substitution() {
        let dir = tempfile::tempdir().unwrap();
        let installer = UpdateInstaller::new(
            Client::new(),
            crate::constants::remote::ARCHIVE_URL_TEMPLATE.to_string(),
            dir.path().to_path_buf(),
            VersionMarker::new(dir.path().join("version.json")),
        );
        assert_eq!(
            installer.url_for("1.2.3"),
            "https://ugaris.com/client/1.2.3_client.zip"
        );
    }

    #[test]
    fn test_progress_fraction() {
        let p = Progress {
            downloaded: 50,
            total: Some(200),
        };
        assert_eq!(p.fraction(), Some(0.25));
        assert_eq!(Progress::default().fraction(), None);
    }

    #[test]
    fn test_install_extracts_and_records_version() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let archive = build_zip(&[
            ("moac.exe", b"binary"),
            ("gfx/", b""),
            ("gfx/tiles.dat", b"tiles"),
        ]);
        let mock = server
            .mock("GET", "/client/42_client.zip")
            .with_status(200)
            .with_body(archive.clone())
            .create();

        let installer = installer(&server, &dir);
        let client_dir = dir.path().join("client");
        fs::create_dir_all(&client_dir).unwrap();
        fs::write(client_dir.join("moac.exe"), b"old binary").unwrap();

        let mut reports = Vec::new();
        let outcome = installer.install("42", |p| reports.push(p));
        mock.assert();

        assert!(matches!(outcome, InstallOutcome::Ok { ref version } if version == "42"));
        assert_eq!(fs::read(client_dir.join("moac.exe")).unwrap(), b"binary");
        assert_eq!(fs::read(client_dir.join("gfx/tiles.dat")).unwrap(), b"tiles");
        assert_eq!(installer.marker.read().as_deref(), Some("42"));
        assert_eq!(leftover_temp_files(&client_dir), 0);

        // Progress is monotonic and ends at the full length
        assert!(reports.windows(2).all(|w| w[0].downloaded <= w[1].downloaded));
        let last = reports.last().unwrap();
        assert_eq!(last.downloaded, archive.len() as u64);
    }

    #[test]
    fn test_stepwise_download_yields_between_chunks() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let payload = vec![7u8; CHUNK_SIZE * 3 + 10];
        let archive = build_zip(&[("data.bin", payload.as_slice())]);
        let _mock = server
            .mock("GET", "/client/7_client.zip")
            .with_status(200)
            .with_body(archive)
            .create();

        let installer = installer(&server, &dir);
        let mut download = installer.begin("7").unwrap();

        let mut steps = 0;
        loop {
            steps += 1;
            match download.step(1).unwrap() {
                Step::Pending(p) => assert!(p.downloaded <= CHUNK_SIZE as u64 * steps),
                Step::Complete(_) => break,
            }
        }
        assert!(steps > 1);
        assert!(matches!(installer.finish(download), InstallOutcome::Ok { .. }));
    }

    #[test]
    fn test_stream_reset_mid_download_is_download_failed() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let _mock = server
            .mock("GET", "/client/11_client.zip")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(&[0u8; 20000])?;
                Err(io::Error::other("connection reset"))
            })
            .create();

        let installer = installer(&server, &dir);
        match installer.install("11", |_| {}) {
            InstallOutcome::DownloadFailed(err) => {
                assert!(matches!(err, LauncherError::Interrupted(_)), "got {err:?}");
                assert_eq!(err.category(), ErrorCategory::Network);
            }
            other => panic!("expected download failure, got {other:?}"),
        }
        assert_eq!(leftover_temp_files(&dir.path().join("client")), 0);
        assert_eq!(installer.marker.read(), None);
    }

    #[test]
    fn test_install_without_content_length() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let archive = build_zip(&[("moac.exe", b"binary")]);
        let body = archive.clone();
        let _mock = server
            .mock("GET", "/client/12_client.zip")
            .with_status(200)
            .with_chunked_body(move |w| w.write_all(&body))
            .create();

        let installer = installer(&server, &dir);
        let mut reports = Vec::new();
        let outcome = installer.install("12", |p| reports.push(p));

        assert!(matches!(outcome, InstallOutcome::Ok { ref version } if version == "12"));
        assert!(!reports.is_empty());
        assert!(reports.iter().all(|p| p.total.is_none() && p.fraction().is_none()));
        assert_eq!(reports.last().unwrap().downloaded, archive.len() as u64);
        assert_eq!(
            fs::read(dir.path().join("client").join("moac.exe")).unwrap(),
            b"binary"
        );
        assert_eq!(installer.marker.read().as_deref(), Some("12"));
    }

    #[test]
    fn test_http_failure_is_download_failed() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let _mock = server
            .mock("GET", "/client/9_client.zip")
            .with_status(404)
            .create();

        let installer = installer(&server, &dir);
        match installer.install("9", |_| {}) {
            InstallOutcome::DownloadFailed(err) => {
                assert_eq!(err.category(), ErrorCategory::Network)
            }
            other => panic!("expected download failure, got {other:?}"),
        }
        assert_eq!(installer.marker.read(), None);
    }

    #[test]
    fn test_corrupt_archive_keeps_marker() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let _mock = server
            .mock("GET", "/client/2_client.zip")
            .with_status(200)
            .with_body("this is not a zip file")
            .create();

        let installer = installer(&server, &dir);
        installer.marker.write("1").unwrap();

        match installer.install("2", |_| {}) {
            InstallOutcome::ExtractFailed(err) => {
                assert_eq!(err.category(), ErrorCategory::Archive)
            }
            other => panic!("expected extract failure, got {other:?}"),
        }
        assert_eq!(installer.marker.read().as_deref(), Some("1"));
        assert_eq!(leftover_temp_files(&dir.path().join("client")), 0);
    }

    #[test]
    fn test_extract_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("malicious.zip");
        fs::write(&zip_path, build_zip(&[("../../outside", b"malicious")])).unwrap();

        let root = dir.path().join("root");
        let err = extract_archive(File::open(&zip_path).unwrap(), &root).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Archive);
        assert!(!dir.path().join("outside").exists());
    }
}
