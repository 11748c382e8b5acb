//! `spkmeans <k> <goal> <file>`
//!
//! Prints the requested matrix (`wam`, `ddg`, `lnorm`, `jacobi`) or, for `spk`, the k-means++
//! seed indices followed by the final centroids. `k = 0` lets the eigengap heuristic choose.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use single_spectral::format::{format_indices, write_matrix};
use single_spectral::{io::read_observations_from_path, ClusterCount, ErrorKind, Goal};
use single_spectral::{SpectralClusteringBuilder, SpectralError};

#[derive(Parser, Debug)]
#[command(name = "spkmeans")]
#[command(version, about = "Normalized spectral k-means clustering")]
struct Cli {
    /// Number of clusters, 0 to pick it with the eigengap heuristic
    k: usize,

    /// wam, ddg, lnorm, jacobi or spk
    goal: Goal,

    /// Headerless CSV with one observation per line
    file: PathBuf,

    /// Seed of the k-means++ generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e)
            if matches!(
                e.kind(),
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
            ) =>
        {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            log::debug!("argument error: {e}");
            return report(ErrorKind::InvalidInput);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:#}");
            let kind = e
                .downcast_ref::<SpectralError>()
                .map(SpectralError::kind)
                .unwrap_or(ErrorKind::ComputationFailure);
            report(kind)
        }
    }
}

fn report(kind: ErrorKind) -> ExitCode {
    println!("{}", kind.message());
    ExitCode::from(kind.exit_status())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let observations = read_observations_from_path(&cli.file)?;
    let n = observations.nrows();
    if cli.k >= n {
        let message = format!("k = {} but only {n} observations", cli.k);
        return Err(SpectralError::invalid_input(message).into());
    }

    let model = SpectralClusteringBuilder::new()
        .n_clusters(ClusterCount::from(cli.k))
        .seed(cli.seed)
        .build();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.goal {
        Goal::Matrix(op) => {
            let result = model.apply_mat_op(op, observations.view())?;
            write_matrix(&mut out, result.view())?;
        }
        Goal::Spk => {
            let result = model.fit(observations.view())?;
            writeln!(out, "{}", format_indices(&result.seed_indices))?;
            write_matrix(&mut out, result.centroids().view())?;
        }
    }

    out.flush()?;
    Ok(())
}
