// report.rs - Flat textual and CSV output of the correlation curve

use std::io::Write;

use csv::WriterBuilder;
use num_traits::Float;

use crate::error::Result;

/// Significant digits of every printed scalar.
pub const PRECISION: usize = 14;

/// One reported lag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow<T> {
    pub lag: usize,
    pub c: T,
    pub c_rms: Option<T>,
    pub n_samples: usize,
}

/// Optional columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub rms: bool,
    pub nsum: bool,
}

impl<T: Float> ReportRow<T> {
    fn fields(&self, opts: ReportOptions) -> Vec<String> {
        let mut fields = vec![self.lag.to_string(), format_scalar(self.c)];
        if opts.rms {
            fields.push(format_scalar(self.c_rms.unwrap_or_else(T::zero)));
        }
        if opts.nsum {
            fields.push(self.n_samples.to_string());
        }
        fields
    }
}

/// `j C(j) [Crms(j)] [N(j)]`, one lag per line.
pub fn write_text<W, T, I>(out: &mut W, rows: I, opts: ReportOptions) -> Result<()>
where
    W: Write,
    T: Float,
    I: IntoIterator<Item = ReportRow<T>>,
{
    for row in rows {
        writeln!(out, "{}", row.fields(opts).join(" "))?;
    }
    out.flush()?;
    Ok(())
}

/// Same columns as [`write_text`], as CSV with a header row.
pub fn write_csv<W, T, I>(out: W, rows: I, opts: ReportOptions) -> Result<()>
where
    W: Write,
    T: Float,
    I: IntoIterator<Item = ReportRow<T>>,
{
    let mut wtr = WriterBuilder::new().from_writer(out);
    let mut header = vec!["lag", "c"];
    if opts.rms {
        header.push("crms");
    }
    if opts.nsum {
        header.push("nsum");
    }
    wtr.write_record(&header)?;
    for row in rows {
        wtr.write_record(row.fields(opts))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Trailer printed after the curve.
pub fn length_banner<T: Float>(length: T) -> String {
    format!(
        "\n#--------------------------------------\n# correlation length = {}",
        format_scalar(length)
    )
}

/// Shortest representation with `PRECISION` significant digits (like `%.14g`).
pub fn format_scalar<T: Float>(x: T) -> String {
    format_g(x.to_f64().unwrap_or(f64::NAN), PRECISION)
}

fn format_g(x: f64, precision: usize) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return x.to_string();
    }
    let p = precision.max(1) as i32;
    let exp = x.abs().log10().floor() as i32;
    if exp < -4 || exp >= p {
        let s = format!("{:.*e}", (p - 1) as usize, x);
        match s.split_once('e') {
            Some((mantissa, e)) => format!("{}e{}", trim_zeros(mantissa), e),
            None => s,
        }
    } else {
        let decimals = (p - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
