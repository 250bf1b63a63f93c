//! Correlation function of one or more multivariate time series
//! (see `Cli` below for all run parameters).
//!
//! Each input row is one sample; blank lines separate independent data sets.
//! The curve goes to stdout, diagnostics and the correlation length to stderr.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

use autocrr::report::{self, ReportOptions};
use autocrr::{AutocrrConfig, CorrelationAccumulator, DataSetReader, LagObserver, TraceObserver};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "autocrr", version, about = "Discretized autocorrelation function and correlation length")]
struct Cli {
    /// Fixed domain size L (lags 0..=L); 0 picks it from the data
    #[arg(short = 'L', long = "domain", default_value_t = 0)]
    domain: usize,

    /// Periodic boundary conditions (wrap i+j around each data set)
    #[arg(short = 'p', long)]
    periodic: bool,

    /// Subtract the average of each data set (default)
    #[arg(long, overrides_with = "avezero")]
    ave: bool,

    /// Assume the average is zero, correlate the raw values
    #[arg(long, overrides_with = "ave")]
    avezero: bool,

    /// Also report the rms fluctuation of each C(j)
    #[arg(long)]
    rms: bool,

    /// Also report the number of pairs averaged into each C(j)
    #[arg(long)]
    nsum: bool,

    /// Stop once C(j) drops below this fraction of C(0), in [-1, 1]
    #[arg(short = 't', long, allow_hyphen_values = true)]
    threshold: Option<f64>,

    /// Write the curve as CSV
    #[arg(long)]
    csv: bool,

    /// Show a progress bar over data sets
    #[arg(long)]
    progress: bool,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Input files ("-" or none reads standard input)
    files: Vec<PathBuf>,
}

impl Cli {
    fn config(&self) -> AutocrrConfig {
        AutocrrConfig {
            domain:       self.domain,
            periodic:     self.periodic,
            subtract_ave: self.ave || !self.avezero,
            report_rms:   self.rms,
            report_nsum:  self.nsum,
            threshold:    self.threshold,
        }
    }

    fn sources(&self) -> io::Result<Vec<(String, Box<dyn BufRead>)>> {
        if self.files.is_empty() {
            return Ok(vec![stdin_source()]);
        }
        self.files
            .iter()
            .map(|path| {
                if path.as_os_str() == "-" {
                    return Ok(stdin_source());
                }
                let file = File::open(path)?;
                let reader: Box<dyn BufRead> = Box::new(BufReader::new(file));
                Ok((path.display().to_string(), reader))
            })
            .collect()
    }
}

fn stdin_source() -> (String, Box<dyn BufRead>) {
    ("standard-input/terminal".to_string(), Box::new(BufReader::new(io::stdin())))
}

/// Per-lag progress shown as the bar message.
struct LagProgress(ProgressBar);

impl LagObserver for LagProgress {
    fn lag_started(&self, lag: usize, reach: usize) {
        self.0.set_message(format!("separation {lag}/{reach}"));
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = cli.config();
    info!(version = env!("CARGO_PKG_VERSION"), config = ?cfg, "starting");
    if cfg.periodic {
        info!("periodic boundary conditions used");
    }
    if let Some(t) = cfg.truncation_threshold() {
        info!(threshold = t, "the correlation function stops when dropping below the threshold (relative to C(0))");
    }

    let mut acc = CorrelationAccumulator::<f64>::new(cfg.clone())?;

    let bar = if cli.progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template(
            " {spinner} {pos} data sets [{elapsed_precise}] {msg}",
        )?);
        bar
    } else {
        ProgressBar::hidden()
    };
    let lag_progress = LagProgress(bar.clone());
    let observer: &dyn LagObserver = if cli.progress { &lag_progress } else { &TraceObserver };

    for (name, input) in cli.sources()? {
        debug!(source = %name, "reading");
        for data_set in DataSetReader::<_, f64>::new(input, name.as_str()) {
            let data_set = data_set?;
            info!(
                data_set = acc.data_sets() + 1,
                source = %name,
                line = data_set.first_line,
                samples = data_set.len(),
                "processing data set"
            );
            acc.accumulate_single_observed(&data_set.samples, observer)?;
            bar.inc(1);
        }
    }
    bar.finish_and_clear();

    let curve = acc.finalize();
    let opts = ReportOptions { rms: cfg.report_rms, nsum: cfg.report_nsum };
    let mut out = BufWriter::new(io::stdout().lock());
    if cli.csv {
        report::write_csv(&mut out, curve.rows(), opts)?;
    } else {
        eprintln!("#----- delta  C(delta) -----\n");
        report::write_text(&mut out, curve.rows(), opts)?;
    }

    eprintln!("{}", report::length_banner(curve.guess_correlation_length()));
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("\n{e}");
        process::exit(1);
    }
}
