//! `CryptoLab` CLI -- classical ciphers and cryptanalysis from the shell.
//!
//! Keys are passed as JSON matching the engine's tagged key model, e.g.
//! `'{"caesar":{"shift":3}}'` or `'{"hill":{"key":{"text":"HILL"}}}'`.
//!
//! # Usage
//!
//! ```bash
//! cryptolab encrypt --cipher caesar --key '{"caesar":{"shift":3}}' "HELLO"
//! cryptolab decrypt --cipher caesar --key '{"caesar":{"shift":3}}' --steps "KHOOR"
//! cryptolab info --cipher playfair
//! cryptolab brute-force "WKLV LV D VHFUHW" --top 5
//! cryptolab frequency "some longer english text"
//! cryptolab recover-key --plaintext HELP --ciphertext HIAT --size 2
//! ```

mod config;

use clap::Parser;

use cryptolab_core::analysis::brute_force;
use cryptolab_core::analysis::frequency;
use cryptolab_core::analysis::known_plaintext;
use cryptolab_core::analysis::AnalysisError;
use cryptolab_core::cipher::{self, CipherError, CipherType};
use cryptolab_core::key::Key;

use config::{ConfigOverrides, LabConfig};

/// CLI arguments.
#[derive(clap::Parser, Debug)]
#[command(version, about = "CryptoLab classical cipher toolkit")]
struct CliArgs {
    /// Path to config file (default: `~/.config/cryptolab/config.toml`).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Print the step-by-step transformation trace.
    #[arg(long, global = true)]
    steps: bool,

    /// Emit machine-readable JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", env = "CRYPTOLAB_LOG", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Subcommands mapping one-to-one onto engine operations.
#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Encrypt text with a cipher and key.
    Encrypt {
        /// Cipher to use (caesar, affine, hill, playfair).
        #[arg(long)]
        cipher: CipherType,
        /// Key as JSON matching the cipher's key model.
        #[arg(long)]
        key: String,
        /// The plaintext.
        text: String,
    },
    /// Decrypt text with a cipher and key.
    Decrypt {
        /// Cipher to use (caesar, affine, hill, playfair).
        #[arg(long)]
        cipher: CipherType,
        /// Key as JSON matching the cipher's key model.
        #[arg(long)]
        key: String,
        /// The ciphertext.
        text: String,
    },
    /// Show reference information about a cipher.
    Info {
        /// Cipher to describe.
        #[arg(long)]
        cipher: CipherType,
    },
    /// Try all 26 Caesar shifts, ranked by English fitness.
    BruteForce {
        /// The ciphertext to attack.
        ciphertext: String,
        /// How many candidates to show (all 26 are computed).
        #[arg(long)]
        top: Option<usize>,
    },
    /// Letter frequency analysis with a chi-squared fit against English.
    Frequency {
        /// The text to analyze.
        text: String,
        /// How many most-common letters to show.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Recover a Hill key matrix from known plaintext and ciphertext.
    RecoverKey {
        /// Known plaintext (letters only are used).
        #[arg(long)]
        plaintext: String,
        /// Matching ciphertext.
        #[arg(long)]
        ciphertext: String,
        /// Matrix dimension (2 or 3).
        #[arg(long, default_value_t = 2)]
        size: usize,
    },
}

/// Errors surfaced to the user; never retried.
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// Key JSON could not be parsed, or output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A cipher operation failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// A cryptanalysis operation failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

fn main() {
    let cli = CliArgs::parse();

    let overrides = ConfigOverrides {
        config: cli.config.clone(),
        show_steps: cli.steps,
        top_k: top_override(&cli.command),
        log_level: cli.log_level.clone(),
    };
    let config = match LabConfig::load(&overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration resolved");

    if let Err(e) = run(&cli.command, &config, cli.json) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Picks up a subcommand's `--top` as a config override.
const fn top_override(command: &Command) -> Option<usize> {
    match command {
        Command::BruteForce { top, .. } | Command::Frequency { top, .. } => *top,
        _ => None,
    }
}

fn run(command: &Command, config: &LabConfig, json: bool) -> Result<(), CliError> {
    match command {
        Command::Encrypt { cipher, key, text } => {
            let key: Key = serde_json::from_str(key)?;
            let output = cipher::encrypt(*cipher, text, &key)?;
            print_cipher_output(&output, config, json)?;
        }
        Command::Decrypt { cipher, key, text } => {
            let key: Key = serde_json::from_str(key)?;
            let output = cipher::decrypt(*cipher, text, &key)?;
            print_cipher_output(&output, config, json)?;
        }
        Command::Info { cipher } => {
            let info = cipher::info(*cipher);
            if json {
                println!("{}", serde_json::to_string_pretty(info)?);
            } else {
                println!("{}", info.name);
                println!("{}", info.description);
                println!("key: {}", info.key_type);
                println!("weaknesses:");
                for w in info.weaknesses {
                    println!("  - {w}");
                }
                println!("defenses:");
                for d in info.defenses {
                    println!("  - {d}");
                }
            }
        }
        Command::BruteForce { ciphertext, .. } => {
            let candidates = brute_force::brute_force_top(ciphertext, config.top_k)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else {
                for c in &candidates {
                    println!("shift {:>2}  score {:>8.2}  {}", c.shift, c.score, c.decrypted_text);
                }
            }
        }
        Command::Frequency { text, .. } => {
            let report = frequency::analyze(text)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("letters analyzed: {}", report.total_letters);
                println!("chi-squared vs English: {}", report.chi_squared);
                for entry in report.most_common(config.top_k) {
                    println!("{}  {:>5}  {:>6.2}%", entry.letter, entry.count, entry.frequency);
                }
            }
        }
        Command::RecoverKey {
            plaintext,
            ciphertext,
            size,
        } => {
            let matrix = known_plaintext::recover_key_from_text(plaintext, ciphertext, *size)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&matrix)?);
            } else {
                println!("recovered key matrix: {matrix}");
            }
        }
    }
    Ok(())
}

/// Prints an encrypt/decrypt result, with steps when configured.
fn print_cipher_output(
    output: &cipher::CipherOutput,
    config: &LabConfig,
    json: bool,
) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }
    println!("{}", output.text);
    if config.show_steps {
        for step in &output.steps {
            eprintln!("  {step}");
        }
    }
    Ok(())
}
