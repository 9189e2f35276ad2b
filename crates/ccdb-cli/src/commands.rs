use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use ccdb_backend::{Backend, BackendConfig, FileObjectProvider, InMemoryObjectProvider};
use ccdb_protocol::EnvelopeCodec;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    debug!(
        store = %config.store,
        algorithm = config.compression.algorithm.name(),
        "loaded backend configuration"
    );
    match cli.command {
        Command::Pack(args) => cmd_pack(&config, args, cli.format),
        Command::Unpack(args) => cmd_unpack(&config, args, cli.format),
        Command::Inspect(args) => cmd_inspect(args, cli.format),
        Command::GetRequest(args) => cmd_get_request(&config, args, cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BackendConfig> {
    match path {
        Some(p) => BackendConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(BackendConfig::default()),
    }
}

#[derive(Debug, Serialize)]
struct PackSummary {
    path: String,
    key: String,
    store: String,
    object_len: usize,
    message_len: usize,
    digest: String,
}

#[derive(Debug, Serialize)]
struct UnpackSummary {
    key: String,
    path: Option<String>,
    object_len: usize,
    digest: String,
}

#[derive(Debug, Serialize)]
struct InspectSummary {
    operation: ccdb_protocol::Operation,
    store: String,
    key: String,
    path: Option<String>,
    value_len: usize,
    value_head: String,
}

fn pack(config: &BackendConfig, args: &PackArgs) -> anyhow::Result<(Vec<u8>, PackSummary)> {
    let provider = FileObjectProvider::new(&args.root);
    let backend = Backend::new(config.clone(), Arc::new(provider))?;
    let (object, message) = backend.pack_object(&args.path, &args.key)?;
    let summary = PackSummary {
        path: args.path.clone(),
        key: args.key.clone(),
        store: backend.store().to_string(),
        object_len: object.size(),
        message_len: message.len(),
        digest: object.digest().to_hex(),
    };
    Ok((message, summary))
}

fn unpack(config: &BackendConfig, message: &[u8]) -> anyhow::Result<(Vec<u8>, UnpackSummary)> {
    let backend = Backend::new(config.clone(), Arc::new(InMemoryObjectProvider::new()))?;
    let object = backend.unpack(message)?;
    let summary = UnpackSummary {
        key: object.key().to_string(),
        path: object.path().map(|p| p.to_string()),
        object_len: object.size(),
        digest: object.digest().to_hex(),
    };
    Ok((object.into_data(), summary))
}

fn inspect(message: &[u8]) -> anyhow::Result<InspectSummary> {
    let env = EnvelopeCodec::decode(message)?;
    Ok(InspectSummary {
        operation: env.operation,
        store: env.destination_store,
        key: env.key,
        path: env.path,
        value_len: env.value.len(),
        value_head: hex::encode(&env.value[..env.value.len().min(16)]),
    })
}

fn cmd_pack(config: &BackendConfig, args: PackArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (message, summary) = pack(config, &args)?;
    write_output(args.output.as_ref(), &message)?;
    report(format, args.output.is_none(), &summary, |s| {
        format!(
            "{} Packed {} as {} for {}\n  Object: {} bytes, digest {}\n  Message: {} bytes",
            "✓".green().bold(),
            s.path.bold(),
            s.key.yellow(),
            s.store.cyan(),
            s.object_len,
            s.digest[..16].dimmed(),
            s.message_len,
        )
    })
}

fn cmd_unpack(config: &BackendConfig, args: UnpackArgs, format: OutputFormat) -> anyhow::Result<()> {
    let message = read_input(&args.message)?;
    let (data, summary) = unpack(config, &message)?;
    write_output(args.output.as_ref(), &data)?;
    report(format, args.output.is_none(), &summary, |s| {
        format!(
            "{} Unpacked {} ({})\n  Object: {} bytes, digest {}",
            "✓".green().bold(),
            s.key.yellow(),
            s.path.as_deref().unwrap_or("path not recorded").bold(),
            s.object_len,
            s.digest[..16].dimmed(),
        )
    })
}

fn cmd_inspect(args: InspectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let message = read_input(&args.message)?;
    let summary = inspect(&message)?;
    report(format, false, &summary, |s| {
        format!(
            "Operation: {}\nStore: {}\nKey: {}\nPath: {}\nValue: {} bytes [{}]",
            s.operation.name().bold(),
            s.store.cyan(),
            s.key.yellow(),
            s.path.as_deref().unwrap_or("-"),
            s.value_len,
            s.value_head.dimmed(),
        )
    })
}

fn cmd_get_request(
    config: &BackendConfig,
    args: GetRequestArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let backend = Backend::new(config.clone(), Arc::new(InMemoryObjectProvider::new()))?;
    let message = backend.get_request(&args.key)?;
    write_output(args.output.as_ref(), &message)?;
    let summary = inspect(&message)?;
    report(format, args.output.is_none(), &summary, |s| {
        format!("{} GET {} from {}", "✓".green().bold(), s.key.yellow(), s.store.cyan())
    })
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn write_output(path: Option<&PathBuf>, data: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(p) => std::fs::write(p, data).with_context(|| format!("writing {}", p.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Print a summary. Goes to stderr when stdout carries binary output.
fn report<T: Serialize>(
    format: OutputFormat,
    stdout_taken: bool,
    summary: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Text => text(summary),
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
    };
    if stdout_taken {
        eprintln!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_args(root: &Path, path: &str, key: &str) -> PackArgs {
        PackArgs {
            path: path.into(),
            key: key.into(),
            root: root.to_path_buf(),
            output: None,
        }
    }

    #[test]
    fn pack_and_unpack_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("TPC/Calib")).unwrap();
        std::fs::write(dir.path().join("TPC/Calib/Gain"), b"gain table").unwrap();

        let config = BackendConfig::default();
        let (message, packed) = pack(&config, &pack_args(dir.path(), "/TPC/Calib/Gain", "g1")).unwrap();
        assert_eq!(packed.object_len, 10);
        assert_eq!(packed.store, "Riak");
        assert_eq!(packed.message_len, message.len());

        let (data, unpacked) = unpack(&config, &message).unwrap();
        assert_eq!(data, b"gain table");
        assert_eq!(unpacked.key, "g1");
        assert_eq!(unpacked.path.as_deref(), Some("/TPC/Calib/Gain"));
        assert_eq!(unpacked.digest, packed.digest);
    }

    #[test]
    fn pack_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = pack(&BackendConfig::default(), &pack_args(dir.path(), "/nope", "k")).unwrap_err();
        assert!(err.to_string().contains("object not found"));
    }

    #[test]
    fn inspect_shows_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("obj"), vec![1u8; 100]).unwrap();
        let (message, _) = pack(&BackendConfig::default(), &pack_args(dir.path(), "obj", "key")).unwrap();

        let s = inspect(&message).unwrap();
        assert_eq!(s.operation, ccdb_protocol::Operation::Put);
        assert_eq!(s.store, "Riak");
        assert_eq!(s.key, "key");
        assert_eq!(s.path.as_deref(), Some("obj"));
        assert!(s.value_head.starts_with("78"));
        assert!(s.value_head.len() <= 32);
    }

    #[test]
    fn inspect_rejects_garbage() {
        assert!(inspect(&[0xFF, 0xFF, 0xFF]).is_err());
    }

    #[test]
    fn config_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("ccdb.toml");
        std::fs::write(&cfg, "store = \"riak-dev\"\n[compression]\nalgorithm = \"zstd\"\n").unwrap();
        std::fs::write(dir.path().join("obj"), b"data").unwrap();

        let config = load_config(Some(&cfg)).unwrap();
        let (message, summary) = pack(&config, &pack_args(dir.path(), "obj", "k")).unwrap();
        assert_eq!(summary.store, "riak-dev");
        assert_eq!(unpack(&config, &message).unwrap().0, b"data");
    }

    #[test]
    fn summaries_serialize_to_json() {
        let s = UnpackSummary {
            key: "k".into(),
            path: None,
            object_len: 3,
            digest: "ab".into(),
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["key"], "k");
        assert!(json["path"].is_null());
    }
}
