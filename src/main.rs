use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use eddy_fluids::StableFluidParams;
use glam::Vec3;
use run::{RecordOptions, RunError};

mod run;

#[derive(Parser, Debug)]
#[command(name = "eddy", version)]
#[command(about = "Pointer-driven stable fluids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the simulation in a window and stir it with the cursor.
    Live {
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Run the simulation headless with a scripted pointer and record every frame.
    Record {
        /// Directory to create for the recording.
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 600)]
        frames: u64,
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Width of the virtual surface, in pixels.
        #[arg(long, default_value_t = 640)]
        width: u32,
        /// Height of the virtual surface, in pixels.
        #[arg(long, default_value_t = 360)]
        height: u32,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Play a recording back. Space toggles play/pause.
    View {
        dir: PathBuf,
    },
}

/// Overrides of the default solver parameters.
#[derive(Args, Debug, Clone, Default)]
struct ParamArgs {
    /// Jacobi sweeps per tick.
    #[arg(long)]
    pressure_iterations: Option<usize>,
    /// Advection timestep.
    #[arg(long)]
    dt: Option<f32>,
    /// Splat radius, as a fraction of the domain height.
    #[arg(long)]
    splat_radius: Option<f32>,
    /// Injected velocity per pixel of pointer motion.
    #[arg(long)]
    pointer_gain: Option<f32>,
    /// Dye colour as `r,g,b`.
    #[arg(long, value_delimiter = ',', num_args = 3)]
    dye: Option<Vec<f32>>,
    /// Simulation resolution relative to the surface.
    #[arg(long)]
    resolution_scale: Option<f32>,
    /// Largest number of texels a field may hold.
    #[arg(long)]
    max_texels: Option<usize>,
}

impl ParamArgs {
    fn params(&self) -> StableFluidParams {
        let defaults = StableFluidParams::default();

        StableFluidParams {
            pressure_iterations: self.pressure_iterations.unwrap_or(defaults.pressure_iterations),
            dt: self.dt.unwrap_or(defaults.dt),
            splat_radius: self.splat_radius.unwrap_or(defaults.splat_radius),
            pointer_gain: self.pointer_gain.unwrap_or(defaults.pointer_gain),
            dye: match self.dye.as_deref() {
                Some(&[r, g, b]) => Vec3::new(r, g, b),
                _ => defaults.dye,
            },
            resolution_scale: self.resolution_scale.unwrap_or(defaults.resolution_scale),
            max_texels: self.max_texels.unwrap_or(defaults.max_texels),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Live { params } => {
            eddy_view::live(params.params());
            Ok(())
        }
        Command::Record { out, frames, fps, width, height, params } => {
            env_logger::init();
            run::record(params.params(), RecordOptions { out, frames, fps, width, height })
        }
        Command::View { dir } => eddy_view::view(dir).map_err(RunError::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
