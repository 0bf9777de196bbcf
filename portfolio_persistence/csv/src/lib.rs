use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, ensure, Context};
use chrono::NaiveDateTime;
use portfolio_models::contact::ContactSubmission;
use portfolio_persistence_contracts::MessageLog;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};
use tracing::{debug, trace};

pub const HEADER: [&str; 4] = ["timestamp", "name", "email", "message"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Append-only CSV file holding one contact submission per row.
///
/// Clones share the same lock, so appends from one process never interleave.
#[derive(Debug, Clone)]
pub struct CsvMessageLog {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl CsvMessageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Default::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MessageLog for CsvMessageLog {
    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    async fn append(&self, submission: &ContactSubmission) -> anyhow::Result<()> {
        let timestamp = submission.timestamp.format(TIMESTAMP_FORMAT).to_string();
        let row = encode([
            &timestamp,
            submission.name.as_str(),
            submission.email.as_str(),
            submission.message.as_str(),
        ])?;

        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let (mut file, created) = open(&self.path).await?;

        let mut buf = if created {
            debug!("starting new message log");
            encode(HEADER)?
        } else {
            Vec::new()
        };
        buf.extend_from_slice(&row);

        let result = write(&mut file, &buf).await;
        drop(file);

        if result.is_err() && created {
            // leave no headerless file behind for the next caller
            let _ = fs::remove_file(&*self.path).await;
        }

        result.with_context(|| format!("Failed to write to {}", self.path.display()))?;
        trace!(bytes = buf.len(), "appended row");

        Ok(())
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    async fn list(&self) -> anyhow::Result<Vec<ContactSubmission>> {
        let content = match fs::read(&*self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        if content.is_empty() {
            return Ok(Vec::new());
        }

        decode(&content)
    }
}

/// Opens the log for appending. The flag is `true` if the file is new or
/// still empty, in which case the caller writes the header.
async fn open(path: &Path) -> anyhow::Result<(File, bool)> {
    let result = OpenOptions::new()
        .append(true)
        .create_new(true)
        .open(path)
        .await;

    match result {
        Ok(file) => Ok((file, true)),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            let file = OpenOptions::new()
                .append(true)
                .open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let empty = file
                .metadata()
                .await
                .with_context(|| format!("Failed to stat {}", path.display()))?
                .len()
                == 0;
            Ok((file, empty))
        }
        Err(err) => Err(err).with_context(|| format!("Failed to create {}", path.display())),
    }
}

async fn write(file: &mut File, buf: &[u8]) -> std::io::Result<()> {
    file.write_all(buf).await?;
    file.flush().await?;
    file.sync_data().await
}

fn encode(record: [&str; 4]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(record)?;
    writer
        .into_inner()
        .map_err(|err| anyhow!("Failed to encode record: {}", err.error()))
}

fn decode(content: &[u8]) -> anyhow::Result<Vec<ContactSubmission>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content);

    let headers = reader.headers().context("Failed to read header")?;
    ensure!(
        headers.iter().eq(HEADER),
        "Unexpected header: {:?}",
        headers
    );

    reader
        .records()
        .enumerate()
        .map(|(idx, record)| {
            let record = record?;
            parse_record(&record).with_context(|| format!("Invalid record at row {}", idx + 1))
        })
        .collect()
}

fn parse_record(record: &csv::StringRecord) -> anyhow::Result<ContactSubmission> {
    let (Some(timestamp), Some(name), Some(email), Some(message)) =
        (record.get(0), record.get(1), record.get(2), record.get(3))
    else {
        anyhow::bail!("Expected 4 fields, found {}", record.len());
    };

    Ok(ContactSubmission {
        // also accepts rows without fractional seconds
        timestamp: timestamp.parse::<NaiveDateTime>()?.and_utc(),
        name: name.try_into()?,
        email: email.try_into()?,
        message: message.try_into()?,
    })
}
