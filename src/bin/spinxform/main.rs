//! spinxform CLI - deform a mesh by a curvature map.
//!
//! Usage: spinxform [OPTIONS] <MESH> <IMAGE> <OUTPUT>
//!
//! Run `spinxform --help` for the available options.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::Parser;

use spinxform::deform::{SpinOptions, SpinTransform};
use spinxform::io::{self, tga::Bitmap};
use spinxform::progress::Progress;
use spinxform::solver::{ConjugateGradient, EigenOptions};

#[derive(Parser)]
#[command(name = "spinxform")]
#[command(author, version, about = "Conformal mesh deformation by spin transformations", long_about = None)]
struct Cli {
    /// Input mesh (OBJ, PLY, or STL)
    mesh: PathBuf,

    /// Curvature change map (8-bit grayscale TGA)
    image: PathBuf,

    /// Output mesh (OBJ, PLY, or STL)
    output: PathBuf,

    /// Curvature change for white pixels (black maps to the negative)
    #[arg(short, long, default_value = "5.0")]
    scale: f64,

    /// Number of inverse power iterations
    #[arg(long, default_value = "3")]
    eigen_iterations: usize,

    /// Diagonal shift applied to the spin energy before solving
    #[arg(long, default_value = "1e-8")]
    eigen_shift: f64,

    /// Maximum conjugate gradient iterations per solve
    #[arg(long, default_value = "10000")]
    max_iterations: usize,

    /// Relative residual tolerance for the conjugate gradient solver
    #[arg(long, default_value = "1e-10")]
    tolerance: f64,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,

    /// Only normalize the input mesh, without deforming it
    #[arg(long)]
    reset: bool,
}

fn main() {
    env_logger::init();
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Parse the command line. Usage errors exit with status 1, the same as any
/// other failure; `--help` and `--version` keep their status 0.
fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        if e.use_stderr() {
            let _ = e.print();
            std::process::exit(1);
        }
        e
    })
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(&cli.mesh)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let bitmap = Bitmap::load(&cli.image)?;
    println!("Curvature map: {}x{}", bitmap.width(), bitmap.height());

    let solver = ConjugateGradient::default()
        .with_max_iterations(cli.max_iterations)
        .with_tolerance(cli.tolerance)
        .with_parallel(!cli.sequential);
    let options = SpinOptions::default().with_eigen(
        EigenOptions::default()
            .with_iterations(cli.eigen_iterations)
            .with_shift(cli.eigen_shift),
    );

    let mut spin = SpinTransform::new(mesh, solver, options);
    spin.set_curvature_change(&bitmap, cli.scale);

    let start = Instant::now();
    if cli.reset {
        println!("Resetting deformation...");
        spin.reset_deformation();
    } else {
        let mode = if cli.sequential { "sequential" } else { "parallel" };
        println!("Applying spin transformation (scale={}, {})...", cli.scale, mode);
        let progress = create_progress();
        spin.update_deformation_with_progress(&progress)?;
    }
    let elapsed = start.elapsed();

    io::save(spin.mesh(), &cli.output)?;
    println!("Saved: {} ({:.2?})", cli.output.display(), elapsed);

    Ok(())
}

/// Progress bar on stderr that only ever moves forward.
fn create_progress() -> Progress<'static> {
    let max_percent = AtomicUsize::new(0);

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<32}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}
