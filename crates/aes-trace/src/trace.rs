//! Human-readable dumps of round states and round keys.

use std::io::{self, Write};

use aes_core::{rows, Block, RoundKeys, RoundObserver, Step};
use clap::ValueEnum;

/// Order in which the 16 state bytes are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Row by row, as the state matrix is drawn on paper.
    #[default]
    Row,
    /// Column by column, i.e. the linear block order.
    Column,
}

/// Settings for [`PrintObserver`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceConfig {
    /// Byte order for state lines.
    pub layout: Layout,
    /// Print the state after every step, not only at round ends.
    pub show_steps: bool,
}

/// Writes the state after each round to `out`.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// returned by [`PrintObserver::finish`].
pub struct PrintObserver<W: Write> {
    out: W,
    config: TraceConfig,
    error: Option<io::Error>,
}

impl<W: Write> PrintObserver<W> {
    /// Creates a printer writing to `out`.
    pub fn new(out: W, config: TraceConfig) -> Self {
        Self {
            out,
            config,
            error: None,
        }
    }

    /// Returns the writer, or the first error hit while printing.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn emit(&mut self, label: &str, round: usize, state: &Block) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = write_state(&mut self.out, label, round, state, self.config.layout) {
            self.error = Some(err);
        }
    }
}

impl<W: Write> RoundObserver for PrintObserver<W> {
    fn on_step(&mut self, round: usize, step: Step, state: &Block) {
        if self.config.show_steps && round > 0 {
            self.emit(step.name(), round, state);
        }
    }

    fn on_round(&mut self, round: usize, state: &Block) {
        let label = if round == 0 { "AddRoundKey" } else { "Round" };
        self.emit(label, round, state);
    }
}

/// Writes one state as `"<label> after Round <r>:"` followed by its bytes.
pub fn write_state<W: Write>(
    out: &mut W,
    label: &str,
    round: usize,
    state: &Block,
    layout: Layout,
) -> io::Result<()> {
    writeln!(out, "{label} after Round {round}:")?;
    match layout {
        Layout::Row => {
            for row in rows(state) {
                for byte in row {
                    write!(out, "{byte:02x} ")?;
                }
            }
        }
        Layout::Column => {
            for byte in state {
                write!(out, "{byte:02x} ")?;
            }
        }
    }
    writeln!(out)
}

/// Dumps all round keys, one 4-byte word per line.
pub fn write_round_keys<W: Write>(out: &mut W, round_keys: &RoundKeys) -> io::Result<()> {
    writeln!(out, "All Round Keys:")?;
    for (round, key) in round_keys.iter().enumerate() {
        writeln!(out, "Round {round} Key: ")?;
        for word in key.chunks_exact(4) {
            for byte in word {
                write!(out, "{byte:02x} ")?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
