//! `perlovka` command line tool.
//!
//! Loads a TIFF, reduces grain in every colour channel and writes the result.
//! All algorithm logic lives in perlovka_core; this binary only handles
//! arguments and file formats.

mod image_io;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};
use ndarray::Array2;

use perlovka_core::channels::{
    clamp_to_u16, crop_border, denoise_planes, merge_channels_u16, merge_channels_u8,
    normalize_to_u8, split_channels,
};
use perlovka_core::denoise::{DEFAULT_ITERATIONS, DEFAULT_RADIUS};
use perlovka_core::{DenoiseConfig, Grid, MatchMode, ResolveMode, RunStats};

use image_io::{load_tiff, save_tiff_u16, save_tiff_u8, CliError, LoadedImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GridArg {
    Odd,
    Even,
    Both,
}

impl From<GridArg> for Grid {
    fn from(arg: GridArg) -> Self {
        match arg {
            GridArg::Odd => Grid::Odd,
            GridArg::Even => Grid::Even,
            GridArg::Both => Grid::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MatchingArg {
    Soft,
    Strict,
}

impl From<MatchingArg> for MatchMode {
    fn from(arg: MatchingArg) -> Self {
        match arg {
            MatchingArg::Soft => MatchMode::Soft,
            MatchingArg::Strict => MatchMode::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ResolverArg {
    Minimal,
    LeastOfMax,
    LargestOfMin,
    Maximal,
}

impl From<ResolverArg> for ResolveMode {
    fn from(arg: ResolverArg) -> Self {
        match arg {
            ResolverArg::Minimal => ResolveMode::Minimal,
            ResolverArg::LeastOfMax => ResolveMode::LeastOfMax,
            ResolverArg::LargestOfMin => ResolveMode::LargestOfMin,
            ResolverArg::Maximal => ResolveMode::Maximal,
        }
    }
}

/// Reduce film grain in 8- and 16-bit grey or RGB TIFF images.
#[derive(Debug, Parser)]
#[command(name = "perlovka", version, about)]
struct Args {
    /// Input TIFF
    input: PathBuf,

    /// Output TIFF
    output: PathBuf,

    /// Maximal grain radius to compensate
    #[arg(long, default_value_t = DEFAULT_RADIUS as u16,
          value_parser = clap::value_parser!(u16).range(1..=100))]
    radius: u16,

    /// Maximum allowed iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS as u16,
          value_parser = clap::value_parser!(u16).range(1..=100))]
    iterations: u16,

    /// Grain detection grid
    #[arg(long, value_enum, default_value_t = GridArg::Odd)]
    grid: GridArg,

    /// Fields matching mode
    #[arg(long, value_enum, default_value_t = MatchingArg::Strict)]
    matching: MatchingArg,

    /// Compensation greediness
    #[arg(long, value_enum, default_value_t = ResolverArg::LeastOfMax)]
    resolver: ResolverArg,

    /// Study all pixels at each radius, not only the ring corners
    #[arg(long)]
    field_matching: bool,

    /// Drop the `radius` wide border the filter cannot reach
    #[arg(long)]
    crop: bool,

    /// Log every sweep
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> DenoiseConfig {
        DenoiseConfig {
            radius: self.radius as usize,
            iterations: self.iterations as usize,
            grid: self.grid.into(),
            matching: self.matching.into(),
            resolver: self.resolver.into(),
            field_matching: self.field_matching,
        }
    }
}

fn log_stats(stats: &[RunStats]) {
    for (channel, s) in stats.iter().enumerate() {
        info!(
            "channel {}: {} iterations, {} compensations",
            channel, s.iterations_made, s.resolved
        );
    }
}

fn finish_planes<P>(planes: &mut Vec<Array2<i32>>, crop: Option<usize>, mut to_range: P)
where
    P: FnMut(&mut Array2<i32>),
{
    for plane in planes.iter_mut() {
        to_range(plane);
        if let Some(radius) = crop {
            *plane = crop_border(plane.view(), radius);
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = args.config();
    config.validate()?;
    let crop = args.crop.then_some(config.radius);

    info!("loading {}", args.input.display());

    match load_tiff(&args.input)? {
        LoadedImage::U8(image) => {
            let mut planes = split_channels(image.view())?;
            let stats = denoise_planes(&mut planes, &config)?;
            log_stats(&stats);

            finish_planes(&mut planes, crop, |p| normalize_to_u8(p.view_mut()));
            save_tiff_u8(&args.output, &merge_channels_u8(&planes)?)?;
        }
        LoadedImage::U16(image) => {
            let mut planes = split_channels(image.view())?;
            let stats = denoise_planes(&mut planes, &config)?;
            log_stats(&stats);

            finish_planes(&mut planes, crop, |p| clamp_to_u16(p.view_mut()));
            save_tiff_u16(&args.output, &merge_channels_u16(&planes)?)?;
        }
    }

    info!("wrote {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
