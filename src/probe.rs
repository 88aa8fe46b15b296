//! Waveform output for the CLI frontend.
//!
//! Writes one CSV row per tick: simulated time, then the resolved value of
//! each probed pin.

use std::io::Write;

use crate::circuit::{PinRef, PinValues};
use crate::error::{LabError, Result};

/// Parse a `component:pin` probe argument.
pub fn parse_probe(text: &str) -> Result<PinRef> {
    PinRef::parse(text).ok_or_else(|| LabError::InvalidProbe {
        probe: text.to_string(),
    })
}

/// CSV writer for probed pin values.
pub struct WaveformWriter<W: Write> {
    out: W,
    probes: Vec<PinRef>,
    header_written: bool,
}

impl<W: Write> WaveformWriter<W> {
    /// Create a writer for the given probe columns.
    pub fn new(out: W, probes: Vec<PinRef>) -> Self {
        Self {
            out,
            probes,
            header_written: false,
        }
    }

    /// The probed pins, in column order.
    pub fn probes(&self) -> &[PinRef] {
        &self.probes
    }

    /// Write one row. The header goes out before the first row.
    pub fn write_row(&mut self, time_ms: u64, values: &PinValues) -> Result<()> {
        if !self.header_written {
            let mut header = String::from("time_ms");
            for probe in &self.probes {
                header.push(',');
                header.push_str(&probe.to_string());
            }
            writeln!(self.out, "{}", header).map_err(output_error)?;
            self.header_written = true;
        }

        let mut row = time_ms.to_string();
        for probe in &self.probes {
            row.push(',');
            row.push_str(&format_value(values.value(probe)));
        }
        writeln!(self.out, "{}", row).map_err(output_error)
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(output_error)
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn output_error(e: std::io::Error) -> LabError {
    LabError::OutputError { message: e.to_string() }
}

/// Integral values print bare (`1`), others with up to four decimals.
fn format_value(value: f64) -> String {
    let text = if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    };
    match text.as_str() {
        "" | "-0" => "0".to_string(),
        _ => text,
    }
}
