// src/bin/synth_series.rs - Generate synthetic trajectories in the autocrr input format

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use autocrr::report::format_scalar;
use autocrr::synth::{alternating, ar1_vectors, as_samples, exponential_decay, stream_rng};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    /// x(i) = exp(-i/tau)
    Exp,
    /// x(i) = phi*x(i-1) + sigma*noise
    Ar1,
    /// +1, -1, +1, ...
    Alt,
}

#[derive(Parser)]
struct Cli {
    /// Series type
    #[arg(long, value_enum, default_value = "ar1")]
    kind: Kind,

    /// Samples per trajectory
    #[arg(short = 'n', long, default_value = "1000")]
    samples: usize,

    /// Number of trajectories (separated by blank lines)
    #[arg(long, default_value = "1")]
    trajectories: usize,

    /// Vector dimension of each sample (ar1 only)
    #[arg(long, default_value = "1")]
    dim: usize,

    /// Decay length for `exp`
    #[arg(long, default_value = "5.0")]
    tau: f64,

    /// AR(1) coefficient
    #[arg(long, default_value = "0.8")]
    phi: f64,

    /// AR(1) noise width
    #[arg(long, default_value = "1.0")]
    sigma: f64,

    /// Master seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output file (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(sink);

    writeln!(out, "# {:?} series, {} trajectories of {} samples, seed {}",
             args.kind, args.trajectories, args.samples, args.seed)?;

    for t in 0..args.trajectories {
        if t > 0 {
            writeln!(out)?;
        }
        let rows: Vec<Vec<f64>> = match args.kind {
            Kind::Exp => as_samples(&exponential_decay(args.samples, args.tau)),
            Kind::Alt => as_samples(&alternating(args.samples)),
            Kind::Ar1 => {
                let mut rng = stream_rng(args.seed, t);
                ar1_vectors(args.samples, args.dim, args.phi, args.sigma, &mut rng)?
            }
        };
        for row in &rows {
            let line: Vec<String> = row.iter().map(|&v| format_scalar(v)).collect();
            writeln!(out, "{}", line.join(" "))?;
        }
    }
    out.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Generated {} trajectories in {}", args.trajectories, path.display());
    }
    if let Kind::Ar1 = args.kind {
        eprintln!("Expected correlation length: {:.4}", -1.0 / args.phi.ln());
    }
    Ok(())
}
