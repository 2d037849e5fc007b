//! The ingest workflow and its persistence collaborators.
//!
//! The engine sits between two stores: an object store the raw file arrives
//! in (and the summary artifact returns to), and a metadata store keyed by
//! file name. Both are traits with filesystem implementations so the
//! workflow takes explicit configuration rather than reading its targets
//! from the environment. An engine failure still persists a metadata record
//! with `status=error`; only store failures propagate to the caller.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;

use crate::{
    analysis,
    cli::ProcessArgs,
    io_utils,
    report::{Analysis, MetadataRecord, SummaryDocument},
};

/// Only objects under this prefix are analyzed; anything else is skipped.
pub const UPLOADS_PREFIX: &str = "uploads/";
/// Summary artifacts land under this prefix.
pub const PROCESSED_PREFIX: &str = "processed/";

pub trait ObjectStore {
    fn fetch(&self, key: &str) -> Result<Vec<u8>>;
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

pub trait MetadataStore {
    fn put_record(&self, record: &MetadataRecord) -> Result<()>;
}

/// Object store rooted at a local directory; keys are relative paths.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            bail!("Object key '{key}' must be a relative path without traversal");
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for FsObjectStore {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;
        fs::read(&path).with_context(|| format!("Reading object {path:?}"))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating object directory {parent:?}"))?;
        }
        fs::write(&path, bytes).with_context(|| format!("Writing object {path:?}"))
    }
}

/// Metadata store writing one pretty-printed JSON record per file name.
pub struct FsMetadataStore {
    dir: PathBuf,
}

impl FsMetadataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn record_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(format!("{file_name}.json"))
    }
}

impl MetadataStore for FsMetadataStore {
    fn put_record(&self, record: &MetadataRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Creating records directory {:?}", self.dir))?;
        let path = self.record_path(&record.file_name);
        let json = serde_json::to_string_pretty(record).context("Serializing metadata record")?;
        fs::write(&path, json).with_context(|| format!("Writing metadata record {path:?}"))
    }
}

/// Object key of the summary artifact for one processed file.
pub fn summary_object_key(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
    format!("{PROCESSED_PREFIX}{stem}_summary.json")
}

/// Runs the full workflow for one object key: fetch, analyze, persist the
/// summary (successful analyses only), and record metadata either way.
/// Returns `None` when the key is outside the uploads prefix.
pub fn ingest<O, M>(
    objects: &O,
    records: &M,
    key: &str,
    upload_timestamp: String,
    delimiter: u8,
) -> Result<Option<Analysis>>
where
    O: ObjectStore,
    M: MetadataStore,
{
    if !key.starts_with(UPLOADS_PREFIX) {
        info!("Skipping object outside {UPLOADS_PREFIX}: {key}");
        return Ok(None);
    }
    let file_name = key.rsplit('/').next().unwrap_or(key).to_string();
    info!("Processing object {key}");

    let bytes = objects.fetch(key)?;
    let analysis = analysis::analyze_with_delimiter(&file_name, &bytes, delimiter);

    if analysis.status.is_success() {
        let summary_key = summary_object_key(&file_name);
        let summary = SummaryDocument::from_analysis(&analysis).to_json_pretty()?;
        objects.put(&summary_key, summary.as_bytes())?;
        info!("Wrote summary for '{file_name}' to {summary_key}");
    }

    let record = MetadataRecord::from_analysis(&analysis, upload_timestamp, now_timestamp());
    records.put_record(&record)?;
    info!(
        "Recorded metadata for '{file_name}' ({})",
        if analysis.status.is_success() {
            "success"
        } else {
            "error"
        }
    );
    Ok(Some(analysis))
}

pub fn execute(args: &ProcessArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Input path {:?} has no file name", args.input))?;

    let objects = FsObjectStore::new(&args.data_root);
    let records = FsMetadataStore::new(
        args.records
            .clone()
            .unwrap_or_else(|| args.data_root.join("records")),
    );

    let bytes =
        fs::read(&args.input).with_context(|| format!("Reading input file {:?}", args.input))?;
    let key = format!("{UPLOADS_PREFIX}{file_name}");
    objects.put(&key, &bytes)?;

    let upload_timestamp = file_modified_timestamp(&args.input)?;
    let analysis = ingest(&objects, &records, &key, upload_timestamp, delimiter)?
        .expect("staged key is always under the uploads prefix");

    if let Some(message) = &analysis.error_message {
        info!("Processing of '{file_name}' finished with status=error: {message}");
    }
    Ok(())
}

/// Upload timestamps come from the source file's modification time; the
/// processed timestamp is taken when the record is assembled.
pub fn file_modified_timestamp(path: &Path) -> Result<String> {
    let metadata =
        fs::metadata(path).with_context(|| format!("Reading file metadata for {path:?}"))?;
    let modified = metadata
        .modified()
        .with_context(|| format!("Reading modification time for {path:?}"))?;
    Ok(DateTime::<Utc>::from(modified).to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
