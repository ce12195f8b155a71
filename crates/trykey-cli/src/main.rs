//! trykey: regenerate an RSA key pair from an IOTA seed
//!
//! Commands:
//!   trykey [SEED]        - derive the RSA-2048 key and print its public key
//!   trykey validate      - check that a seed is well-formed trytes
//!   trykey generate      - print a fresh random seed
//!   trykey config show   - display the effective configuration
//!
//! The seed is read from the positional argument, then $TRYKEY_SEED, then an
//! interactive prompt. Nothing is written to disk.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use secrecy::{ExposeSecret, SecretString};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;
use zeroize::Zeroizing;

use trykey_core::config::{expand_tilde, DerivationConfig, TrykeyConfig};
use trykey_rsa::{fingerprint, private_key_pem, public_key_pem, RsaKeyDeriver};
use trykey_seed::{derive_key, generate_passphrase, validate, LengthCheck, SeedParams};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "trykey",
    version,
    about = "Deterministic RSA keys from IOTA seeds",
    long_about = "trykey: regenerate the same RSA key pair from an 81-tryte IOTA seed, on demand, \
                  without storing the private key",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Path to config.toml
    #[arg(
        long,
        short = 'c',
        env = "TRYKEY_CONFIG",
        default_value = "~/.config/trykey/config.toml",
        global = true
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides config
    #[arg(long, env = "TRYKEY_LOG", global = true)]
    log: Option<String>,

    /// Log format; overrides config
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(flatten)]
    derive: DeriveArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct DeriveArgs {
    /// IOTA seed (81 trytes: 9, A-Z). Falls back to $TRYKEY_SEED, then a prompt.
    passphrase: Option<SeedArg>,

    /// RSA key size in bits (overrides config)
    #[arg(long)]
    bits: Option<u32>,

    /// Also print the PKCS#8 private key
    #[arg(long)]
    private: bool,

    /// Derive twice and fail unless both keys are identical
    #[arg(long)]
    verify: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a seed is well-formed without deriving a key
    Validate {
        /// IOTA seed. Falls back to $TRYKEY_SEED, then a prompt.
        passphrase: Option<SeedArg>,
    },

    /// Print a new random IOTA seed
    Generate,

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

/// A seed given on the command line. Zeroized on drop, redacted in `Debug`.
#[derive(Clone)]
struct SeedArg(Zeroizing<String>);

impl std::str::FromStr for SeedArg {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Zeroizing::new(s.to_owned())))
    }
}

impl fmt::Debug for SeedArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeedArg([REDACTED])")
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TrykeyConfig::load(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    let level = cli.log.as_deref().unwrap_or(&config.log.level);
    let format = match cli.log_format {
        Some(format) => format,
        None => LogFormat::from_str(&config.log.format, true)
            .map_err(|e| anyhow::anyhow!("invalid log format in config: {e}"))?,
    };
    init_logging(level, format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "trykey starting"
    );

    match cli.command {
        None => cmd_derive(&config, cli.derive),
        Some(Commands::Validate { passphrase }) => cmd_validate(&config, passphrase),
        Some(Commands::Generate) => cmd_generate(),
        Some(Commands::Config { action: ConfigAction::Show }) => {
            cmd_config_show(&config, &cli.config)
        }
    }
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries key material only; logs go to stderr
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

// ── Passphrase input ──────────────────────────────────────────────────────────

/// Resolve the seed: argument > $TRYKEY_SEED > interactive prompt
fn read_passphrase(arg: Option<SeedArg>) -> Result<SecretString> {
    if let Some(SeedArg(passphrase)) = arg {
        return Ok(into_secret(passphrase));
    }
    if let Ok(passphrase) = std::env::var("TRYKEY_SEED").map(Zeroizing::new) {
        if !passphrase.is_empty() {
            return Ok(into_secret(passphrase));
        }
    }
    let passphrase = rpassword::prompt_password("IOTA seed: ")
        .map(Zeroizing::new)
        .context("reading seed from terminal")?;
    Ok(into_secret(passphrase))
}

/// Copy into an exactly-sized secret; the source buffer, spare capacity
/// included, is zeroized when it drops here.
fn into_secret(source: Zeroizing<String>) -> SecretString {
    SecretString::from(source.as_str())
}

fn seed_params(config: &DerivationConfig, bits: Option<u32>) -> SeedParams {
    SeedParams {
        key_bits: bits.unwrap_or(config.key_bits),
        length: length_check(config),
    }
}

fn length_check(config: &DerivationConfig) -> LengthCheck {
    if config.exact_length {
        LengthCheck::Exact(config.passphrase_len)
    } else {
        LengthCheck::Any
    }
}

// ── `trykey [SEED]` ───────────────────────────────────────────────────────────

fn cmd_derive(config: &TrykeyConfig, args: DeriveArgs) -> Result<()> {
    let params = seed_params(&config.derivation, args.bits);
    let passphrase = read_passphrase(args.passphrase)?;

    info!(bits = params.key_bits, "deriving RSA key");
    let key = derive_key(&RsaKeyDeriver, &passphrase, &params).context("deriving RSA key")?;

    if args.verify {
        let again = derive_key(&RsaKeyDeriver, &passphrase, &params)
            .context("deriving RSA key for verification")?;
        if again != key {
            anyhow::bail!("derived keys differ: key generation is not deterministic");
        }
        info!("verified: repeated derivation produced an identical key");
    }
    drop(passphrase);

    println!("# {}", fingerprint(&key)?);
    print!("{}", public_key_pem(&key)?);
    if args.private {
        print!("{}", private_key_pem(&key)?.as_str());
    }
    Ok(())
}

// ── `trykey validate` ─────────────────────────────────────────────────────────

fn cmd_validate(config: &TrykeyConfig, arg: Option<SeedArg>) -> Result<()> {
    let passphrase = read_passphrase(arg)?;
    let check = length_check(&config.derivation);
    validate(passphrase.expose_secret(), check).context("validating seed")?;
    println!("ok: {} trytes", passphrase.expose_secret().len());
    Ok(())
}

// ── `trykey generate` ─────────────────────────────────────────────────────────

fn cmd_generate() -> Result<()> {
    let passphrase = generate_passphrase();
    eprintln!("Write this seed down. It is the only copy of your key.");
    println!("{}", passphrase.expose_secret());
    Ok(())
}

// ── `trykey config show` ──────────────────────────────────────────────────────

fn cmd_config_show(config: &TrykeyConfig, config_path: &Path) -> Result<()> {
    print!("{}", render_config(config, config_path)?);
    Ok(())
}

/// Header naming the source (as `TrykeyConfig::load` resolves it) plus the TOML body
fn render_config(config: &TrykeyConfig, config_path: &Path) -> Result<String> {
    let resolved = expand_tilde(config_path);
    let header = if resolved.exists() {
        format!("# Configuration from: {}", resolved.display())
    } else {
        format!("# Configuration: defaults (no file at {})", resolved.display())
    };
    let rendered = config.to_toml().context("serializing config to TOML")?;
    Ok(format!("{header}\n\n{rendered}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const SEED: &str =
        "DEJUXV9ZQMIEXTWJJHJPLAWMOEKGAYDNALKSMCLG9AGPR9LCKHMLNZVCRFNFEPMGOBOYYIKJNYWSAVPAI";

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_seed_derives() {
        let cli = Cli::try_parse_from(["trykey", SEED, "--verify"]).unwrap();
        assert!(cli.command.is_none());
        let passphrase = cli.derive.passphrase.as_ref().unwrap();
        assert_eq!(passphrase.0.as_str(), SEED);
        assert!(cli.derive.verify);
        assert!(!cli.derive.private);
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["trykey", "validate", SEED]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Validate { passphrase: Some(ref p) }) if p.0.as_str() == SEED
        ));

        let cli = Cli::try_parse_from(["trykey", "generate"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Generate)));

        let cli = Cli::try_parse_from(["trykey", "--log", "debug", "config", "show"]).unwrap();
        assert_eq!(cli.log.as_deref(), Some("debug"));
        assert!(matches!(
            cli.command,
            Some(Commands::Config { action: ConfigAction::Show })
        ));
    }

    #[test]
    fn test_seed_params_from_config() {
        let config = DerivationConfig::default();
        let params = seed_params(&config, None);
        assert_eq!(params, SeedParams::default());

        let params = seed_params(&config, Some(1024));
        assert_eq!(params.key_bits, 1024);

        let relaxed = DerivationConfig {
            exact_length: false,
            ..DerivationConfig::default()
        };
        assert_eq!(seed_params(&relaxed, None).length, LengthCheck::Any);
    }

    #[test]
    fn test_positional_seed_wins() {
        let arg = SeedArg(Zeroizing::new(SEED.to_string()));
        let passphrase = read_passphrase(Some(arg)).unwrap();
        assert_eq!(passphrase.expose_secret(), SEED);
    }

    #[test]
    fn test_env_seed_used_without_argument() {
        std::env::set_var("TRYKEY_SEED", SEED);
        let passphrase = read_passphrase(None).unwrap();
        std::env::remove_var("TRYKEY_SEED");
        assert_eq!(passphrase.expose_secret(), SEED);
    }

    #[test]
    fn test_secret_copied_from_oversized_buffer() {
        let mut source = String::with_capacity(256);
        source.push_str(SEED);
        source.push('\n');
        source.pop();
        assert!(source.capacity() > source.len());

        let secret = into_secret(Zeroizing::new(source));
        assert_eq!(secret.expose_secret(), SEED);
    }

    #[test]
    fn test_seed_never_in_debug_output() {
        let cli = Cli::try_parse_from(["trykey", SEED, "--private"]).unwrap();
        let debug = format!("{cli:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(SEED));

        let cli = Cli::try_parse_from(["trykey", "validate", SEED]).unwrap();
        let debug = format!("{cli:?}");
        assert!(!debug.contains(SEED));
    }

    #[test]
    fn test_config_show_resolves_home_path() {
        let home = tempfile::tempdir().unwrap();
        let dir = home.path().join(".config/trykey");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[log]\nlevel = \"info\"\n").unwrap();
        std::env::set_var("HOME", home.path());

        let config_path = Path::new("~/.config/trykey/config.toml");
        let config = TrykeyConfig::load(config_path).unwrap();
        let rendered = render_config(&config, config_path).unwrap();

        let expected = format!("# Configuration from: {}", dir.join("config.toml").display());
        assert!(rendered.starts_with(&expected), "{rendered}");
        assert!(rendered.contains("level = \"info\""));
    }

    #[test]
    fn test_config_show_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("absent.toml");
        let rendered = render_config(&TrykeyConfig::default(), &config_path).unwrap();
        assert!(rendered.starts_with("# Configuration: defaults (no file at"));
        assert!(rendered.contains("key_bits = 2048"));
    }
}
