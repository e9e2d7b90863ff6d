mod config;
mod engine;
mod format;
mod metrics;
mod session;
mod storage;

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::{ToolConfig, DEFAULT_CONFIG_FILE};
use engine::{symbols::display_symbol, CodecError, CompressionRun};
use format::EncodedFormat;
use session::Session;
use storage::LocalStorage;

#[derive(Parser)]
#[command(name = "huffzip")]
#[command(about = "Greedy Huffman compression for text files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, help = "Config file path")]
    config: Option<String>,

    #[arg(long, help = "Output as JSON")]
    json: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Encode one or more text files
    Compress {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(long, value_enum, help = "Encoded format (overrides config)")]
        format: Option<EncodedFormat>,

        #[arg(long, help = "Do not write the metadata sidecar for ASCII output")]
        no_metadata: bool,

        #[arg(long, help = "Skip reading back and decoding the written file")]
        no_verify: bool,
    },
    /// Decode an encoded file using only what is on disk
    Decompress {
        input: PathBuf,

        #[arg(long, help = "Where to write the decoded text")]
        output: Option<PathBuf>,

        #[arg(long, help = "Metadata sidecar path for ASCII input")]
        metadata: Option<PathBuf>,
    },
    /// Show symbol frequencies and generated codes without writing anything
    Inspect {
        input: PathBuf,
    },
    /// Compress a file, then decode it again and show a preview
    Roundtrip {
        input: PathBuf,
    },
    /// Write the default configuration file
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("huffzip=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ToolConfig::load(cli.config.as_deref())?;
    let storage = Arc::new(LocalStorage::default());

    match cli.command {
        Commands::Compress { inputs, format, no_metadata, no_verify } => {
            if let Some(format) = format {
                config.format = format;
            }
            if no_metadata {
                config.write_metadata = false;
            }
            if no_verify {
                config.verify_after_write = false;
            }

            // One job per file, each with its own session and tree
            let mut handles = Vec::with_capacity(inputs.len());
            for input in inputs {
                let storage = Arc::clone(&storage);
                let config = config.clone();
                handles.push(tokio::spawn(async move {
                    let mut session = Session::new(storage, config);
                    session.load(&input).await?;
                    let report = session.compress().await?;
                    anyhow::Ok(report)
                }));
            }

            let total = handles.len();
            let mut failures = 0;
            for handle in handles {
                match skip_warnings(handle.await?, cli.json) {
                    Ok(Some(report)) => {
                        if cli.json {
                            println!("{}", serde_json::to_string_pretty(&report)?);
                        } else {
                            println!("{}", report.render());
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        failures += 1;
                        report_failure(&e, cli.json);
                    }
                }
            }

            if failures > 0 {
                anyhow::bail!("{} of {} inputs failed", failures, total);
            }
        }
        Commands::Decompress { input, output, metadata } => {
            let session = Session::new(storage, config);
            let report = session
                .decompress_file(&input, output.as_deref(), metadata.as_deref())
                .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("✅ Decoded {} -> {}", report.source, report.output);
                println!("   Format: {}", report.format);
                println!("   Symbols: {}", report.symbol_count);
                println!("   Bits: {}", report.bit_length);
                println!("   SHA-256 verified: {}", report.verified);
            }
        }
        Commands::Inspect { input } => {
            let mut session = Session::new(storage, config);
            let text = Arc::clone(&session.load(&input).await?.text);
            let run = tokio::task::spawn_blocking(move || CompressionRun::prepare(&text)).await?;

            let Some(tree) = run.tree.as_ref() else {
                report_failure(&CodecError::EmptyInput.into(), cli.json);
                return Ok(());
            };
            let bits = run.table.encoded_len(&run.frequencies);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                    "source": input.display().to_string(),
                    "symbol_count": tree.total_freq(),
                    "distinct_symbols": tree.leaf_count(),
                    "tree_nodes": tree.node_count(),
                    "tree_depth": tree.depth(),
                    "encoded_bits": bits,
                    "codes": run.entries(),
                }))?);
            } else {
                println!("📈 {}", input.display());
                println!("===================");
                println!("Symbols: {}", tree.total_freq());
                println!("Distinct symbols: {}", tree.leaf_count());
                println!("Tree nodes: {}", tree.node_count());
                println!("Longest code: {} bits", tree.depth().max(1));
                println!("Encoded length: {} bits ({} packed bytes)", bits, bits.div_ceil(8));
                println!();
                for entry in run.entries() {
                    println!("{:>10} {:>8}  {}", display_symbol(entry.symbol), entry.count, entry.code);
                }
            }
        }
        Commands::Roundtrip { input } => {
            let mut session = Session::new(storage, config);
            session.load(&input).await?;

            let Some(report) = skip_warnings(session.compress().await, cli.json)? else {
                return Ok(());
            };
            let preview = session.decode_preview().await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                    "report": report,
                    "preview": preview,
                }))?);
            } else {
                println!("{}", report.render());
                println!("\nDecoded text (preview):");
                println!("{}", preview);
            }
        }
        Commands::GenerateConfig { output } => {
            ToolConfig::default().save(&output)?;
            if cli.json {
                println!("{}", serde_json::json!({"config": output}));
            } else {
                println!("✅ Wrote default configuration to {}", output);
            }
        }
    }

    info!("Done");
    Ok(())
}

/// Empty input and missing runs are warnings, not faults.
fn is_warning(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<CodecError>(),
        Some(CodecError::EmptyInput) | Some(CodecError::NotCompressed)
    )
}

/// Reports warnings and turns them into `None`; every other error is
/// returned so the process exits non-zero.
fn skip_warnings<T>(result: anyhow::Result<T>, json: bool) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_warning(&e) => {
            report_failure(&e, json);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn report_failure(e: &anyhow::Error, json: bool) {
    let warning = is_warning(e);

    if warning {
        warn!("{}", e);
    } else {
        error!("{:#}", e);
    }

    if json {
        println!("{}", serde_json::json!({
            "error": format!("{:#}", e),
            "warning": warning,
        }));
    } else if warning {
        eprintln!("⚠️  {}", e);
    } else {
        eprintln!("❌ {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_a_warning() {
        let err: anyhow::Error = CodecError::EmptyInput.into();
        assert!(is_warning(&err));
        let err = anyhow::Error::from(CodecError::NotCompressed).context("decoding preview");
        assert!(is_warning(&err));
    }

    #[test]
    fn io_and_codec_faults_are_not_warnings() {
        let io = std::io::Error::other("Is a directory");
        let err = anyhow::Error::from(io).context("failed to write ./in_codificado.txt");
        assert!(!is_warning(&err));
        assert!(!is_warning(&CodecError::UnknownSymbol('x').into()));
    }

    #[test]
    fn warnings_are_skipped_without_failing() {
        let result: anyhow::Result<u32> = Err(CodecError::EmptyInput.into());
        assert!(matches!(skip_warnings(result, true), Ok(None)));
        assert!(matches!(skip_warnings(Ok(7), true), Ok(Some(7))));
    }

    #[test]
    fn write_failures_are_propagated() {
        let result: anyhow::Result<u32> = Err(anyhow::anyhow!("failed to write ./in_codificado.txt"));
        let err = skip_warnings(result, true).unwrap_err();
        assert!(err.to_string().contains("in_codificado.txt"));
    }
}
