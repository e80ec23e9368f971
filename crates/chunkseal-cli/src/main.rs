//! chunkseal: encrypt and decrypt single chunks with a passphrase
//!
//! Commands:
//!   encrypt <in> <out>  - seal a file into one frame
//!   decrypt <in> <out>  - open a frame back into the original bytes
//!   inspect <in>        - print a frame's header fields (no key needed)
//!   config show         - display the effective configuration
//!
//! `-` reads from stdin / writes to stdout. Logs always go to stderr.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretSlice;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use chunkseal_core::{ChunkSealConfig, ChunkSealError, ChunkSealResult, CipherConfig};
use chunkseal_crypto::{
    ChunkCipher, CipherError, CipherOptions, CipherParams, FrameHeader, KdfParams, TAG_SIZE,
};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "chunkseal",
    version,
    about = "Passphrase-derived chunk encryption",
    long_about = "chunkseal: seal byte chunks into self-describing frames (scrypt + XChaCha20-Poly1305)"
)]
struct Cli {
    /// Path to chunkseal.toml configuration file
    #[arg(long, short = 'c', env = "CHUNKSEAL_CONFIG", default_value = "chunkseal.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "CHUNKSEAL_LOG")]
    log: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "CHUNKSEAL_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file into a single frame
    Encrypt {
        /// Plaintext input (`-` for stdin)
        input: PathBuf,
        /// Frame output (`-` for stdout)
        output: PathBuf,
        /// Key material file (overrides config key_file)
        #[arg(long, short = 'k')]
        key_file: Option<PathBuf>,
    },

    /// Decrypt a single frame
    Decrypt {
        /// Frame input (`-` for stdin)
        input: PathBuf,
        /// Plaintext output (`-` for stdout)
        output: PathBuf,
        /// Key material file (overrides config key_file)
        #[arg(long, short = 'k')]
        key_file: Option<PathBuf>,
    },

    /// Print the header fields of a frame
    Inspect {
        /// Frame input (`-` for stdin)
        input: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[derive(Clone, Debug, ValueEnum, PartialEq)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ChunkSealConfig::load(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = match cli.log_format.clone() {
        Some(format) => format,
        None => parse_log_format(&config.log.format)?,
    };
    init_logging(&level, &format);

    match cli.command {
        Commands::Encrypt { input, output, key_file } => {
            cmd_encrypt(&config, &input, &output, key_file.as_deref())
        }
        Commands::Decrypt { input, output, key_file } => {
            cmd_decrypt(&config, &input, &output, key_file.as_deref())
        }
        Commands::Inspect { input } => cmd_inspect(&config, &input),
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    LogFormat::from_str(value, true)
        .map_err(|_| anyhow::anyhow!("invalid log format '{value}' (expected json or text)"))
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── Key resolution ────────────────────────────────────────────────────────────

/// Resolve key material: CLI flag > config key_file > env var > prompt
fn resolve_key(config: &CipherConfig, key_file_override: Option<&Path>) -> ChunkSealResult<SecretSlice<u8>> {
    if let Some(key) = key_from_file_or_env(config, key_file_override)? {
        return Ok(key);
    }

    let passphrase = rpassword::prompt_password("chunkseal passphrase: ")
        .map_err(|e| ChunkSealError::Key(format!("reading passphrase: {e}")))?;
    non_empty(passphrase.into_bytes(), "prompt")
}

fn key_from_file_or_env(
    config: &CipherConfig,
    key_file_override: Option<&Path>,
) -> ChunkSealResult<Option<SecretSlice<u8>>> {
    if let Some(path) = key_file_override.or(config.key_file.as_deref()) {
        let bytes = std::fs::read(path)
            .map_err(|e| ChunkSealError::Key(format!("reading key file {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "using key file");
        return non_empty(bytes, &path.display().to_string()).map(Some);
    }

    if let Some(value) = std::env::var_os(&config.key_env) {
        tracing::debug!(var = %config.key_env, "using key from environment");
        let bytes = os_string_bytes(value, &config.key_env)?;
        return non_empty(bytes, &config.key_env).map(Some);
    }

    Ok(None)
}

#[cfg(unix)]
fn os_string_bytes(value: std::ffi::OsString, _var: &str) -> ChunkSealResult<Vec<u8>> {
    use std::os::unix::ffi::OsStringExt;
    Ok(value.into_vec())
}

#[cfg(not(unix))]
fn os_string_bytes(value: std::ffi::OsString, var: &str) -> ChunkSealResult<Vec<u8>> {
    value
        .into_string()
        .map(String::into_bytes)
        .map_err(|_| ChunkSealError::Key(format!("{var} is not valid UTF-8")))
}

fn non_empty(bytes: Vec<u8>, source: &str) -> ChunkSealResult<SecretSlice<u8>> {
    if bytes.is_empty() {
        return Err(ChunkSealError::Key(format!("key from {source} is empty")));
    }
    Ok(SecretSlice::from(bytes))
}

fn cipher_options(config: &CipherConfig, key: Option<SecretSlice<u8>>) -> CipherOptions {
    CipherOptions {
        salt_size: config.salt_size,
        nonce_size: config.nonce_size,
        key_size: config.key_size,
        key,
        kdf: KdfParams::default(),
    }
}

fn build_cipher(config: &CipherConfig, key_file_override: Option<&Path>) -> Result<ChunkCipher> {
    let key = resolve_key(config, key_file_override)?;
    ChunkCipher::init(cipher_options(config, Some(key))).context("initializing cipher")
}

// ── I/O helpers ───────────────────────────────────────────────────────────────

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if is_stdio(path) {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(data).context("writing stdout")?;
        stdout.flush().context("flushing stdout")
    } else {
        std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))
    }
}

// ── `chunkseal encrypt` ───────────────────────────────────────────────────────

fn cmd_encrypt(
    config: &ChunkSealConfig,
    input: &Path,
    output: &Path,
    key_file: Option<&Path>,
) -> Result<()> {
    let cipher = build_cipher(&config.cipher, key_file)?;
    let plaintext = read_input(input)?;
    let frame = encrypt_bytes(&cipher, &plaintext)?;
    write_output(output, &frame)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = plaintext.len(),
        frame_bytes = frame.len(),
        "encrypted"
    );
    Ok(())
}

fn encrypt_bytes(cipher: &ChunkCipher, plaintext: &[u8]) -> Result<Vec<u8>> {
    cipher.encrypt(plaintext).context("encrypting chunk")
}

// ── `chunkseal decrypt` ───────────────────────────────────────────────────────

fn cmd_decrypt(
    config: &ChunkSealConfig,
    input: &Path,
    output: &Path,
    key_file: Option<&Path>,
) -> Result<()> {
    let cipher = build_cipher(&config.cipher, key_file)?;
    let frame = read_input(input)?;
    let plaintext = decrypt_bytes(&cipher, &frame)?;
    write_output(output, &plaintext)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = plaintext.len(),
        "decrypted"
    );
    Ok(())
}

fn decrypt_bytes(cipher: &ChunkCipher, frame: &[u8]) -> Result<Vec<u8>> {
    cipher.decrypt(frame).map_err(|e| match e {
        CipherError::Authentication => {
            anyhow::anyhow!("decryption failed: wrong key, wrong parameters, or tampered data")
        }
        other => anyhow::Error::new(other).context("decrypting chunk"),
    })
}

// ── `chunkseal inspect` ───────────────────────────────────────────────────────

fn cmd_inspect(config: &ChunkSealConfig, input: &Path) -> Result<()> {
    let frame = read_input(input)?;
    print!("{}", describe_frame(&config.cipher, &frame)?);
    Ok(())
}

fn describe_frame(config: &CipherConfig, frame: &[u8]) -> Result<String> {
    let params = CipherParams::resolve(&cipher_options(config, None))?;
    let header = FrameHeader::parse(frame, params.nonce_size, params.salt_size)
        .context("parsing frame")?;

    Ok(format!(
        "frame_length   {}\n\
         nonce          {}\n\
         salt           {}\n\
         sealed_bytes   {}\n\
         plaintext_len  {}\n",
        header.declared_len,
        STANDARD.encode(header.nonce),
        STANDARD.encode(header.salt),
        header.sealed.len(),
        header.sealed.len().saturating_sub(TAG_SIZE),
    ))
}

// ── `chunkseal config show` ───────────────────────────────────────────────────

fn cmd_config_show(config: &ChunkSealConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = config
        .to_toml_string()
        .context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}
