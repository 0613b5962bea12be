mod logging;
mod output;

use anyhow::{Context, Result};
use bootmeasure_core::{
    Algorithm, BootEntry, Digest, Glob, HostFs, MatchOutcome, MeasureConfig, MeasurementStatus,
    Measurer, Volume, VolumeTable, path,
};
use clap::{Parser, Subcommand};
use output::{
    GlobOutput, GlobResult, HashOutput, OutputWriter, RESULT_DEGRADED, RESULT_ERROR,
    RESULT_MISMATCH, RESULT_OK,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Environment variable naming a default config file.
const CONFIG_ENV: &str = "BOOTMEASURE_CONFIG";

/// bootmeasure - integrity measurement for boot entries
#[derive(Parser)]
#[command(name = "bootmeasure")]
#[command(about = "Measure boot entries into a single digest", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to BOOTMEASURE_CONFIG env var, then built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure one boot entry
    Hash {
        /// Loader path on the volume, optionally qualified as NAME:\path
        #[arg(long)]
        loader: String,

        /// Load options passed to the loader
        #[arg(long, default_value = "")]
        options: String,

        /// Initrd path
        #[arg(long, default_value = "")]
        initrd: String,

        /// Glob path to measure instead of the loader directory (repeatable)
        #[arg(long = "hash-path")]
        hash_paths: Vec<String>,

        /// Host directory holding the entry's volume
        #[arg(long)]
        volume_root: PathBuf,

        /// Volume label
        #[arg(long, default_value = "")]
        volume_name: String,

        /// Partition name
        #[arg(long, default_value = "")]
        partition_name: String,

        /// Extra volume for NAME: qualifiers, as NAME=DIR (repeatable)
        #[arg(long = "volume")]
        volumes: Vec<String>,

        /// Hash algorithm (sha256 or blake3)
        #[arg(long)]
        algo: Option<String>,

        /// Bytes per content read
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Deepest directory level to enter
        #[arg(long)]
        max_depth: Option<usize>,

        /// Hash directory entries in file system order instead of by name
        #[arg(long)]
        unsorted: bool,

        /// Expected digest (hex); exit with code 3 when the measurement differs
        #[arg(long)]
        expect: Option<String>,
    },

    /// Check candidate names against a glob pattern
    Glob {
        /// Pattern using * and ?
        pattern: String,

        /// Names to check
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.json);
    let verbose = cli.verbose > 0;

    if let Err(e) = logging::init_logging(cli.verbose, cli.log_file.as_deref()) {
        writer.write_error(&e, RESULT_ERROR);
        return ExitCode::from(RESULT_ERROR);
    }

    let result = match cli.command {
        Commands::Hash {
            loader,
            options,
            initrd,
            hash_paths,
            volume_root,
            volume_name,
            partition_name,
            volumes,
            algo,
            chunk_size,
            max_depth,
            unsorted,
            expect,
        } => load_config(cli.config)
            .and_then(|mut config| {
                if let Some(algo) = algo {
                    config.algorithm = Algorithm::parse(&algo)?;
                }
                if let Some(chunk_size) = chunk_size {
                    config.chunk_size = chunk_size;
                }
                if let Some(max_depth) = max_depth {
                    config.max_depth = max_depth;
                }
                if unsorted {
                    config.sort_entries = false;
                }
                config.validate()?;
                Ok(config)
            })
            .and_then(|config| {
                let entry = BootEntry::new(loader)
                    .with_options(options)
                    .with_initrd(initrd);
                let entry = hash_paths
                    .into_iter()
                    .fold(entry, |entry, pattern| entry.with_hash_path(pattern));
                let primary = Volume::new(
                    volume_name,
                    partition_name,
                    Arc::new(HostFs::new(volume_root)),
                );
                let expected = expect
                    .as_deref()
                    .map(Digest::from_hex)
                    .transpose()
                    .context("Invalid --expect digest")?;
                cmd_hash(&writer, config, entry, primary, &volumes, expected, verbose)
            }),
        Commands::Glob { pattern, values } => cmd_glob(&writer, &pattern, values),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            writer.write_error(&e, RESULT_ERROR);
            ExitCode::from(RESULT_ERROR)
        }
    }
}

/// Resolve settings: --config flag > BOOTMEASURE_CONFIG > defaults.
fn load_config(flag: Option<PathBuf>) -> Result<MeasureConfig> {
    let path = flag.or_else(|| {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    });

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            MeasureConfig::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(MeasureConfig::default()),
    }
}

/// Parse a NAME=DIR volume argument.
fn parse_volume_arg(arg: &str) -> Result<Volume> {
    let (name, dir) = arg
        .split_once('=')
        .with_context(|| format!("Expected NAME=DIR, got: {}", arg))?;
    if name.is_empty() || dir.is_empty() {
        anyhow::bail!("Expected NAME=DIR, got: {}", arg);
    }
    Ok(Volume::new(name, "", Arc::new(HostFs::new(dir))))
}

fn cmd_hash(
    writer: &OutputWriter,
    config: MeasureConfig,
    entry: BootEntry,
    primary: Volume,
    extra_volumes: &[String],
    expected: Option<Digest>,
    verbose: bool,
) -> Result<u8> {
    if !primary.fs().is_dir(path::ROOT) {
        anyhow::bail!("Volume root is not a directory");
    }

    let mut table = VolumeTable::new();
    let primary = table.add(primary);
    for arg in extra_volumes {
        table.add(parse_volume_arg(arg)?);
    }

    let algorithm = config.algorithm;
    tracing::debug!(volumes = table.len(), %algorithm, "measuring boot entry");
    let measurer = Measurer::new(config, Arc::new(table));
    let mut entry = entry.on_volume(primary);

    let status = measurer.generate_hash(&mut entry);
    let digest = *entry.digest().context("Measurement produced no digest")?;
    let report = entry.report().cloned().unwrap_or_default();

    let matches_expected = expected.map(|want| want == digest);
    if matches_expected == Some(false) {
        tracing::warn!(loader = %entry.loader_path, %digest, "digest differs from expected");
    }
    let result_code = result_code(status, matches_expected);

    let output = HashOutput {
        success: true,
        result_code,
        loader_path: entry.loader_path.clone(),
        algorithm: algorithm.as_str().to_string(),
        digest,
        expected,
        matches_expected,
        status,
        measured_at: chrono::Utc::now().to_rfc3339(),
        report,
    };

    writer.write(&output, || output.to_text(verbose))?;

    Ok(result_code)
}

/// A digest mismatch outranks a degraded measurement.
fn result_code(status: MeasurementStatus, matches_expected: Option<bool>) -> u8 {
    match (matches_expected, status) {
        (Some(false), _) => RESULT_MISMATCH,
        (_, MeasurementStatus::Complete) => RESULT_OK,
        (_, MeasurementStatus::Degraded) => RESULT_DEGRADED,
    }
}

fn cmd_glob(writer: &OutputWriter, pattern: &str, values: Vec<String>) -> Result<u8> {
    let glob = Glob::new(pattern);
    tracing::debug!(pattern, candidates = values.len(), "checking glob");

    let results = values
        .into_iter()
        .map(|value| {
            let outcome = glob.evaluate(&value);
            GlobResult {
                matched: outcome.is_match(),
                too_complex: outcome == MatchOutcome::TooComplex,
                value,
            }
        })
        .collect();

    let output = GlobOutput {
        success: true,
        result_code: RESULT_OK,
        pattern: pattern.to_string(),
        results,
    };

    writer.write(&output, || output.to_text())?;

    Ok(RESULT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_volume_arg() {
        let volume = parse_volume_arg("DATA=/mnt/data").unwrap();
        assert_eq!(volume.name(), "DATA");
        assert!(parse_volume_arg("DATA").is_err());
        assert!(parse_volume_arg("=/mnt").is_err());
        assert!(parse_volume_arg("DATA=").is_err());
    }

    #[test]
    fn test_result_codes() {
        use MeasurementStatus::{Complete, Degraded};

        assert_eq!(result_code(Complete, None), RESULT_OK);
        assert_eq!(result_code(Complete, Some(true)), RESULT_OK);
        assert_eq!(result_code(Degraded, None), RESULT_DEGRADED);
        assert_eq!(result_code(Degraded, Some(true)), RESULT_DEGRADED);
        assert_eq!(result_code(Complete, Some(false)), RESULT_MISMATCH);
        assert_eq!(result_code(Degraded, Some(false)), RESULT_MISMATCH);
    }

    #[test]
    fn test_hash_args() {
        let cli = Cli::try_parse_from([
            "bootmeasure",
            "--json",
            "hash",
            "--loader",
            "\\EFI\\refind\\refind_x64.efi",
            "--volume-root",
            "/boot/efi",
            "--hash-path",
            "EFI/refind/*.conf",
            "--hash-path",
            "DATA:\\keys\\*",
            "--volume",
            "DATA=/mnt/data",
            "--expect",
            "ab",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Hash {
                hash_paths,
                volumes,
                options,
                expect,
                ..
            } => {
                assert_eq!(hash_paths.len(), 2);
                assert_eq!(expect.as_deref(), Some("ab"));
                assert_eq!(volumes, vec!["DATA=/mnt/data".to_string()]);
                assert_eq!(options, "");
            }
            Commands::Glob { .. } => panic!("expected hash command"),
        }
    }
}
