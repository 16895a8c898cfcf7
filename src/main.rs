use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use nalgebra::Point3;

use rock_garden::{math::Float, render, sink, Light, Mode, RenderConfig, Scene, Tiling};

#[derive(Parser, Debug)]
#[command(name = "rock-garden")]
#[command(about = "Render a rippled rock garden to a png", long_about = None)]
#[command(version)]
struct Cli {
    /// Distance between ripple peaks, in pixels
    #[arg(short, long, default_value_t = 8.)]
    interval: Float,

    /// Width of each of the 3x3 segments, in pixels
    #[arg(long, default_value_t = rock_garden::field::SEGMENT_WIDTH)]
    segment_width: Float,

    /// Brightness added regardless of the lights
    #[arg(long, default_value_t = rock_garden::scene::AMBIENT)]
    ambient: Float,

    /// A point light as `x,y,z,intensity`. May be repeated; replaces the default light
    #[arg(long = "light", value_parser = parse_light)]
    lights: Vec<Light>,

    /// Number of render threads [default: number of cpus]
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    #[arg(long, value_enum, default_value_t = CliMode::Shaded)]
    mode: CliMode,

    /// Print a preview of the image to stdout
    #[arg(long)]
    ascii: bool,

    /// Where to write the png
    #[arg(short, long, default_value = "test.png")]
    output: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliMode {
    /// Lit surface
    Shaded,
    /// Surface normals
    Normals,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Shaded => Mode::Shaded,
            CliMode::Normals => Mode::Normals,
        }
    }
}

fn parse_light(s: &str) -> Result<Light, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<Float>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid light `{}`: {}", s, err))?;

    match parts.as_slice() {
        [x, y, z, intensity] => Ok(Light::new(Point3::new(*x, *y, *z), *intensity)),
        _ => Err(format!(
            "invalid light `{}`: expected `x,y,z,intensity`",
            s
        )),
    }
}

fn build_scene(cli: &Cli) -> Result<Scene> {
    let tiling = Tiling::new(cli.segment_width).context("invalid segment width")?;
    let mut builder = Scene::builder()
        .set_interval(cli.interval)
        .set_tiling(tiling)
        .set_ambient(cli.ambient);
    if !cli.lights.is_empty() {
        builder = builder.set_lights(cli.lights.clone());
    }
    builder.build().context("invalid scene")
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let scene = build_scene(&cli)?;

    let config = match cli.threads {
        Some(threads) => RenderConfig::new(threads),
        None => RenderConfig::default(),
    }
    .with_mode(cli.mode.into());

    info!(
        "interval {}, {} light(s), ambient {}",
        scene.interval(),
        scene.lights().len(),
        scene.ambient()
    );

    let canvas = render(&scene, &config);

    if cli.ascii {
        print!("{}", canvas.to_ascii());
    }

    sink::save_png(&canvas, &cli.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_light() {
        assert_eq!(
            Ok(Light::new(Point3::new(96., 0., 96.), 2.)),
            parse_light("96,0,96,2")
        );
        assert_eq!(
            Ok(Light::new(Point3::new(-1.5, 2., 3.), 0.25)),
            parse_light(" -1.5, 2,3 ,0.25")
        );
        assert!(parse_light("1,2,3").is_err());
        assert!(parse_light("1,2,3,4,5").is_err());
        assert!(parse_light("a,b,c,d").is_err());
    }

    #[test]
    fn test_cli() {
        let cli = Cli::try_parse_from([
            "rock-garden",
            "--interval",
            "4",
            "--light",
            "0,0,10,1",
            "--light",
            "96,96,10,1",
            "-j",
            "3",
            "--mode",
            "normals",
            "-o",
            "out.png",
        ])
        .unwrap();
        assert_eq!(4., cli.interval);
        assert_eq!(2, cli.lights.len());
        assert_eq!(Some(3), cli.threads);
        assert_eq!(Mode::Normals, Mode::from(cli.mode));
        assert_eq!(PathBuf::from("out.png"), cli.output);

        let cli = Cli::try_parse_from(["rock-garden"]).unwrap();
        assert_eq!(8., cli.interval);
        assert_eq!(32., cli.segment_width);
        assert!(cli.lights.is_empty());
        assert!(!cli.ascii);
    }

    #[test]
    fn test_build_scene_errors_have_context() {
        let cli = Cli::try_parse_from(["rock-garden", "--segment-width", "1e6"]).unwrap();
        let err = build_scene(&cli).unwrap_err();
        assert_eq!("invalid segment width", err.to_string());
        assert!(format!("{:#}", err).contains("segment width must be positive"));

        let cli = Cli::try_parse_from(["rock-garden", "--interval", "0"]).unwrap();
        assert_eq!("invalid scene", build_scene(&cli).unwrap_err().to_string());

        let cli = Cli::try_parse_from(["rock-garden", "--light", "1,2,3,4"]).unwrap();
        assert_eq!(1, build_scene(&cli).unwrap().lights().len());
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
