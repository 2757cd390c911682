//! Command-line interface for tracing AES-128 encryption round by round.

#![forbid(unsafe_code)]

mod trace;

use std::io::{self, Write};

use aes_core::{
    block_from_slice, encrypt_block, encrypt_block_observed, expand_key, Aes128Key, Block,
    LogObserver, RoundObserver, RoundKeys, Step,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, LevelFilter};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::trace::{write_round_keys, Layout, PrintObserver, TraceConfig};

/// Sample key used by `demo`, in linear (column-major) order.
const DEMO_KEY_HEX: &str = "1a87b7920c54080f24950e56f2bc4396";
/// Sample plaintext used by `demo`.
const DEMO_PLAINTEXT_HEX: &str = "0000000000000000000000ab000000e6";

const FIPS_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f";
const FIPS_PLAINTEXT_HEX: &str = "00112233445566778899aabbccddeeff";
const FIPS_CIPHERTEXT_HEX: &str = "69c4e0d86a7b0430d8cdb78070b4c55a";
const ZERO_CIPHERTEXT_HEX: &str = "66e94bd4ef8a2c3b884cfa59ca342b2e";

/// AES-128 round tracer.
#[derive(Parser)]
#[command(
    name = "aes128",
    version,
    about = "AES-128 encryption with per-round state and round key dumps"
)]
struct Cli {
    /// Log verbosity (`RUST_LOG` takes precedence when set).
    #[arg(long, global = true, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt one block and print the ciphertext.
    Encrypt {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Plaintext block as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        plaintext_hex: String,
        /// Print the state after every round.
        #[arg(long, default_value_t = false)]
        trace: bool,
        /// Also print the state after every step inside a round.
        #[arg(long, default_value_t = false)]
        steps: bool,
        /// Byte order used when printing states.
        #[arg(long, value_enum, default_value_t = Layout::Row)]
        layout: Layout,
    },
    /// Print the expanded round keys for a key.
    Keys {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
    },
    /// Run the built-in sample key and plaintext with a full trace.
    Demo {
        /// Byte order used when printing states.
        #[arg(long, value_enum, default_value_t = Layout::Row)]
        layout: Layout,
    },
    /// Verify known answers and determinism on random samples.
    Check {
        /// Number of random samples to test.
        #[arg(long, default_value_t = 16)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    match cli.command {
        Commands::Encrypt {
            key_hex,
            plaintext_hex,
            trace,
            steps,
            layout,
        } => {
            let config = trace.then_some(TraceConfig {
                layout,
                show_steps: steps,
            });
            cmd_encrypt(&key_hex, &plaintext_hex, config)
        }
        Commands::Keys { key_hex } => cmd_keys(&key_hex),
        Commands::Demo { layout } => cmd_demo(layout),
        Commands::Check { samples, seed } => cmd_check(samples, seed),
    }
}

fn init_logger(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

fn cmd_encrypt(key_hex: &str, plaintext_hex: &str, trace: Option<TraceConfig>) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let block = parse_block_hex(plaintext_hex)?;
    let round_keys = expand_key(&key);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let ciphertext = match trace {
        Some(config) => trace_block(&mut out, &block, &round_keys, config)?,
        None => encrypt_block_observed(&block, &round_keys, &mut LogObserver),
    };
    writeln!(out, "ciphertext: {}", hex::encode(ciphertext))?;
    Ok(())
}

fn cmd_keys(key_hex: &str) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let round_keys = expand_key(&key);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_round_keys(&mut out, &round_keys).context("write round keys")?;
    Ok(())
}

fn cmd_demo(layout: Layout) -> Result<()> {
    let key = parse_key_hex(DEMO_KEY_HEX)?;
    let block = parse_block_hex(DEMO_PLAINTEXT_HEX)?;
    let round_keys = expand_key(&key);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    write_round_keys(&mut out, &round_keys).context("write round keys")?;
    let config = TraceConfig {
        layout,
        show_steps: false,
    };
    let ciphertext = trace_block(&mut out, &block, &round_keys, config)?;
    writeln!(out, "ciphertext: {}", hex::encode(ciphertext))?;
    Ok(())
}

fn cmd_check(samples: usize, seed: Option<u64>) -> Result<()> {
    let key = parse_key_hex(FIPS_KEY_HEX)?;
    let plaintext = parse_block_hex(FIPS_PLAINTEXT_HEX)?;
    let round_keys = expand_key(&key);
    if round_keys.get(0) != key.as_bytes() {
        bail!("round key 0 differs from the cipher key");
    }
    let ciphertext = encrypt_block(&plaintext, &round_keys);
    if hex::encode(ciphertext) != FIPS_CIPHERTEXT_HEX {
        bail!(
            "FIPS-197 known answer mismatch: got {}",
            hex::encode(ciphertext)
        );
    }
    info!("FIPS-197 known answer ok");

    let zero = encrypt_block(&[0u8; 16], &expand_key(&Aes128Key::from([0u8; 16])));
    if hex::encode(zero) != ZERO_CIPHERTEXT_HEX {
        bail!("all-zero vector mismatch: got {}", hex::encode(zero));
    }
    info!("all-zero vector ok");

    let mut rng = seeded_rng(seed);
    for sample in 0..samples {
        let mut key_bytes = [0u8; 16];
        let mut block = [0u8; 16];
        rng.fill_bytes(&mut key_bytes);
        rng.fill_bytes(&mut block);
        let key = Aes128Key::from(key_bytes);
        let first = expand_key(&key);
        let second = expand_key(&key);
        if first != second {
            bail!("sample {sample}: key expansion is not deterministic");
        }
        let ct = encrypt_block(&block, &first);
        if ct != encrypt_block(&block, &second) {
            bail!("sample {sample}: encryption is not deterministic");
        }
        debug!(
            "sample {sample}: key {} plaintext {} ciphertext {}",
            hex::encode(key_bytes),
            hex::encode(block),
            hex::encode(ct)
        );
    }

    println!("check passed ({samples} random samples)");
    Ok(())
}

/// Encrypts `block`, printing round states to `out` and logging alongside.
fn trace_block<W: Write>(
    out: &mut W,
    block: &Block,
    round_keys: &RoundKeys,
    config: TraceConfig,
) -> Result<Block> {
    let mut observer = Tee(PrintObserver::new(&mut *out, config), LogObserver);
    let ciphertext = encrypt_block_observed(block, round_keys, &mut observer);
    observer.0.finish().context("write round trace")?;
    Ok(ciphertext)
}

/// Forwards every callback to two observers.
struct Tee<A, B>(A, B);

impl<A: RoundObserver, B: RoundObserver> RoundObserver for Tee<A, B> {
    fn on_key_schedule(&mut self, round_keys: &RoundKeys) {
        self.0.on_key_schedule(round_keys);
        self.1.on_key_schedule(round_keys);
    }

    fn on_step(&mut self, round: usize, step: Step, state: &Block) {
        self.0.on_step(round, step, state);
        self.1.on_step(round, step, state);
    }

    fn on_round(&mut self, round: usize, state: &Block) {
        self.0.on_round(round, state);
        self.1.on_round(round, state);
    }
}

fn parse_key_hex(hex_str: &str) -> Result<Aes128Key> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    Aes128Key::try_from(bytes.as_slice())
        .context("AES-128 key must be 16 bytes (32 hex characters)")
}

fn parse_block_hex(hex_str: &str) -> Result<Block> {
    let bytes = hex::decode(hex_str.trim()).context("decode block hex")?;
    block_from_slice(&bytes).context("block must be 16 bytes (32 hex characters)")
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_core::RecordingObserver;

    #[test]
    fn parses_demo_inputs() {
        let key = parse_key_hex(DEMO_KEY_HEX).unwrap();
        assert_eq!(key.as_bytes()[..4], [0x1a, 0x87, 0xb7, 0x92]);
        let block = parse_block_hex(DEMO_PLAINTEXT_HEX).unwrap();
        assert_eq!(block[11], 0xab);
        assert_eq!(block[15], 0xe6);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(parse_key_hex("zz").is_err());
        assert!(parse_key_hex("0011").is_err());
        assert!(parse_block_hex(&"00".repeat(17)).is_err());
        assert!(parse_key_hex(&format!(" {FIPS_KEY_HEX}\n")).is_ok());
    }

    #[test]
    fn demo_trace_ends_with_ciphertext() {
        let key = parse_key_hex(DEMO_KEY_HEX).unwrap();
        let block = parse_block_hex(DEMO_PLAINTEXT_HEX).unwrap();
        let mut out = Vec::new();
        let ct = trace_block(&mut out, &block, &expand_key(&key), TraceConfig::default()).unwrap();
        assert_eq!(hex::encode(ct), "dbc74e75ff9a7c051a51d4ca8eede1d7");
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(" after Round ").count(), 11);
    }

    #[test]
    fn tee_reaches_both_sides() {
        let round_keys = expand_key(&Aes128Key::from([4u8; 16]));
        let mut tee = Tee(RecordingObserver::default(), RecordingObserver::default());
        encrypt_block_observed(&[0u8; 16], &round_keys, &mut tee);
        assert_eq!(tee.0, tee.1);
        assert_eq!(tee.0.rounds.len(), 11);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = seeded_rng(Some(7));
        let mut b = seeded_rng(Some(7));
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn check_passes() {
        cmd_check(4, Some(1)).unwrap();
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "aes128",
            "encrypt",
            "--key-hex",
            FIPS_KEY_HEX,
            "--plaintext-hex",
            FIPS_PLAINTEXT_HEX,
            "--trace",
            "--layout",
            "column",
        ])
        .unwrap();
        match cli.command {
            Commands::Encrypt { trace, layout, .. } => {
                assert!(trace);
                assert_eq!(layout, Layout::Column);
            }
            _ => panic!("expected encrypt"),
        }
        assert_eq!(cli.log_level, LevelFilter::Warn);
    }
}
