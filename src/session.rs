use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{bail, Context};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ToolConfig;
use crate::engine::{
    bitstream::EncodedStream,
    compress,
    hash::sha256,
    CodecError, CompressionRun,
};
use crate::format::{
    ascii::{parse_ascii, write_ascii},
    metadata::EncodedMetadata,
    packed::PackedContainer,
    EncodedFormat, FormatError,
};
use crate::metrics::{compression_percentage, CompressionReport};
use crate::storage::{paths, text::decode_lossy, StorageEngine};

#[derive(Debug, Clone)]
pub struct LoadedText {
    pub path: PathBuf,
    pub text: Arc<str>,
    pub original_bytes: u64,
}

/// Result of the last successful compression, kept together so later
/// decodes always use the tree that produced the stream.
#[derive(Debug, Clone)]
struct CompletedRun {
    run: Arc<CompressionRun>,
    stream: Arc<EncodedStream>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecompressionReport {
    pub source: String,
    pub output: String,
    pub format: String,
    pub bit_length: u64,
    pub symbol_count: u64,
    pub verified: bool,
}

pub struct Session<S: StorageEngine> {
    storage: Arc<S>,
    config: ToolConfig,
    loaded: Option<LoadedText>,
    last_run: Option<CompletedRun>,
}

impl<S: StorageEngine> Session<S> {
    pub fn new(storage: Arc<S>, config: ToolConfig) -> Self {
        Self {
            storage,
            config,
            loaded: None,
            last_run: None,
        }
    }

    /// Reads a text file, dropping invalid UTF-8. Any earlier run is
    /// discarded since it belongs to a different input.
    pub async fn load(&mut self, path: &Path) -> anyhow::Result<&LoadedText> {
        let size = self.storage.size(path).await?;
        if size > self.config.max_input_size {
            bail!(
                "{} is {} bytes, above the {} byte limit",
                path.display(),
                size,
                self.config.max_input_size
            );
        }

        let bytes = self.storage.read(path).await?;
        let text: Arc<str> = decode_lossy(&bytes).into();
        if text.len() != bytes.len() {
            warn!("Dropped {} invalid bytes from {}", bytes.len() - text.len(), path.display());
        }

        info!("Loaded {} ({} bytes)", path.display(), bytes.len());
        self.last_run = None;
        Ok(&*self.loaded.insert(LoadedText {
            path: path.to_path_buf(),
            text,
            original_bytes: bytes.len() as u64,
        }))
    }

    /// Runs the pipeline on the loaded text on a blocking worker, writes the
    /// encoded file (and sidecar) and reports sizes measured on disk.
    pub async fn compress(&mut self) -> anyhow::Result<CompressionReport> {
        let Some(loaded) = self.loaded.clone() else {
            bail!("no input loaded, load a .txt file first");
        };
        if loaded.text.is_empty() {
            return Err(CodecError::EmptyInput.into());
        }

        let text = Arc::clone(&loaded.text);
        let (run, stream) = tokio::task::spawn_blocking(move || compress(&text)).await??;
        debug!("Encoded {} symbols into {} bits", run.symbol_count(), stream.len());

        let format = self.config.format;
        let output = paths::encoded_path(&loaded.path, &self.config.encoded_suffix, format);
        let source_name = file_label(&loaded.path);

        match format {
            EncodedFormat::Ascii => {
                self.storage.write(&output, &write_ascii(&stream)).await?;

                if self.config.write_metadata {
                    let meta = EncodedMetadata::new(
                        source_name.clone(),
                        loaded.original_bytes,
                        loaded.text.as_bytes(),
                        run.symbol_count(),
                        &stream,
                        run.entries(),
                    );
                    let meta_path = EncodedMetadata::path_for(&output);
                    self.storage.write(&meta_path, &meta.to_json()?).await?;
                    debug!("Wrote metadata sidecar {}", meta_path.display());
                }
            }
            EncodedFormat::Packed => {
                let container = PackedContainer {
                    entries: run.entries(),
                    symbol_count: run.symbol_count(),
                    original_sha256: sha256(loaded.text.as_bytes()),
                    stream: stream.clone(),
                };
                self.storage.write(&output, &container.encode()?).await?;
            }
        }

        let run = Arc::new(run);
        let stream = Arc::new(stream);

        if self.config.verify_after_write {
            self.verify_written(&output, format, &run, &loaded.text).await?;
        }

        let original_bytes = loaded.original_bytes;
        let encoded_bytes = self.storage.size(&output).await?;
        let compression_percent = match compression_percentage(original_bytes, encoded_bytes) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        let report = CompressionReport {
            source: source_name,
            output: output.display().to_string(),
            format: format.id().to_string(),
            original_bytes,
            encoded_bytes,
            compression_percent,
            distinct_symbols: run.table.len(),
            symbol_count: run.symbol_count(),
            bit_length: stream.len() as u64,
            codes: run.entries(),
        };

        info!(
            "Compressed {} -> {} ({} -> {} bytes)",
            loaded.path.display(),
            output.display(),
            original_bytes,
            encoded_bytes
        );

        self.last_run = Some(CompletedRun { run, stream });
        Ok(report)
    }

    /// Decodes the last compression result and returns its first
    /// `preview_chars` characters followed by "...".
    pub async fn decode_preview(&self) -> anyhow::Result<String> {
        let Some(last) = self.last_run.clone() else {
            return Err(CodecError::NotCompressed.into());
        };

        let decoded = tokio::task::spawn_blocking(move || last.run.decode(&last.stream)).await??;
        let mut preview: String = decoded.chars().take(self.config.preview_chars).collect();
        preview.push_str("...");
        Ok(preview)
    }

    /// Decodes an encoded file using only what is on disk: the packed
    /// container, or the ASCII bits plus their metadata sidecar.
    pub async fn decompress_file(
        &self,
        encoded: &Path,
        output: Option<&Path>,
        metadata: Option<&Path>,
    ) -> anyhow::Result<DecompressionReport> {
        let data = self.storage.read(encoded).await?;
        let format = EncodedFormat::detect(&data);
        debug!("Detected {} for {}", format.id(), encoded.display());

        let (text, symbol_count, bit_length) = match format {
            EncodedFormat::Packed => {
                let container = PackedContainer::decode(&data)?;
                let bit_length = container.stream.len() as u64;
                let symbol_count = container.symbol_count;
                let expected_hash = container.original_sha256;

                let text = tokio::task::spawn_blocking(move || -> Result<String, FormatError> {
                    let run = CompressionRun::from_entries(&container.entries)?;
                    Ok(run.decode(&container.stream)?)
                })
                .await??;

                if sha256(text.as_bytes()) != expected_hash {
                    return Err(FormatError::IntegrityMismatch.into());
                }
                (text, symbol_count, bit_length)
            }
            EncodedFormat::Ascii => {
                let meta_path = metadata
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| EncodedMetadata::path_for(encoded));
                if !self.storage.exists(&meta_path).await {
                    bail!(
                        "{} has no metadata sidecar ({}); ASCII bit files carry no code table",
                        encoded.display(),
                        meta_path.display()
                    );
                }

                let meta = EncodedMetadata::from_json(&self.storage.read(&meta_path).await?)
                    .with_context(|| format!("reading {}", meta_path.display()))?;
                let stream = parse_ascii(&data)?;
                meta.check_stream(&stream)?;

                let entries = meta.codes.clone();
                let text = tokio::task::spawn_blocking(move || -> Result<String, FormatError> {
                    let run = CompressionRun::from_entries(&entries)?;
                    Ok(run.decode(&stream)?)
                })
                .await??;

                if !meta.verify_integrity(text.as_bytes()) {
                    return Err(FormatError::IntegrityMismatch.into());
                }
                (text, meta.symbol_count, meta.bit_length)
            }
        };

        let decoded_count = text.chars().count() as u64;
        if decoded_count != symbol_count {
            return Err(FormatError::LengthMismatch {
                expected: symbol_count,
                actual: decoded_count,
            }
            .into());
        }

        let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
            paths::decoded_path(encoded, &self.config.encoded_suffix, &self.config.decoded_suffix)
        });
        self.storage.write(&output, text.as_bytes()).await?;
        info!("Decoded {} -> {}", encoded.display(), output.display());

        Ok(DecompressionReport {
            source: encoded.display().to_string(),
            output: output.display().to_string(),
            format: format.id().to_string(),
            bit_length,
            symbol_count,
            verified: true,
        })
    }

    async fn verify_written(
        &self,
        output: &Path,
        format: EncodedFormat,
        run: &Arc<CompressionRun>,
        text: &Arc<str>,
    ) -> anyhow::Result<()> {
        let data = self.storage.read(output).await?;
        let stream = match format {
            EncodedFormat::Ascii => parse_ascii(&data)?,
            EncodedFormat::Packed => PackedContainer::decode(&data)?.stream,
        };

        let run = Arc::clone(run);
        let decoded = tokio::task::spawn_blocking(move || run.decode(&stream)).await??;
        if decoded.as_str() != &**text {
            return Err(FormatError::IntegrityMismatch)
                .with_context(|| format!("verification of {} failed", output.display()));
        }

        debug!("Verified {}", output.display());
        Ok(())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
