// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use log::info;
use mandelzoom::{PngSink, RenderConfig, Scheduler};
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn parse_ratio(s: &str) -> Option<f64> {
    match parse_pair::<f64>(s, ':') {
        Some((w, h)) if h > 0.0 => Some(w / h),
        Some(_) => None,
        None => f64::from_str(s).ok(),
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const HEIGHT: &str = "height";
const RATIO: &str = "ratio";
const ORIGIN: &str = "origin";
const ITERATIONS: &str = "iterations";
const FRAMES: &str = "frames";
const START_FRAME: &str = "start-frame";
const TARGET: &str = "target";
const ZOOM_SPEED: &str = "zoom-speed";
const ITERATION_STEP: &str = "iteration-step";
const BAND_ROWS: &str = "band-rows";
const FRAME_WORKERS: &str = "frame-workers";
const COMPUTE_WORKERS: &str = "compute-workers";

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("mandelzoom")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders a zoom into the Mandelbrot set as numbered PNG frames")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("out")
                .help("Existing directory the frames are written to"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .long(HEIGHT)
                .short("y")
                .takes_value(true)
                .default_value("1080")
                .validator(|s| {
                    validate_range(
                        &s,
                        1u32,
                        65_535,
                        "Could not parse frame height",
                        "Frame height must be between 1 and 65535",
                    )
                })
                .help("Height of each frame in pixels"),
        )
        .arg(
            Arg::with_name(RATIO)
                .long(RATIO)
                .short("r")
                .takes_value(true)
                .default_value("16:9")
                .validator(|s| match parse_ratio(&s) {
                    Some(r) if r > 0.0 => Ok(()),
                    _ => Err("Could not parse aspect ratio".to_string()),
                })
                .help("Aspect ratio, as W:H or a single number"),
        )
        .arg(
            Arg::with_name(ORIGIN)
                .long(ORIGIN)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.5,-1.15")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse origin"))
                .help("Corner of the first view; its imaginary part must be negative"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1u32,
                        10_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 10000000",
                    )
                })
                .help("Iteration budget of the first frame"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("n")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1u32,
                        9_999,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 9999",
                    )
                })
                .help("Number of frames in the zoom"),
        )
        .arg(
            Arg::with_name(START_FRAME)
                .long(START_FRAME)
                .short("s")
                .takes_value(true)
                .default_value("0")
                .validator(|s| {
                    validate_range(
                        &s,
                        0u32,
                        9_998,
                        "Could not parse start frame",
                        "Start frame must be between 0 and 9998",
                    )
                })
                .help("First frame to render; earlier frames are skipped"),
        )
        .arg(
            Arg::with_name(TARGET)
                .long(TARGET)
                .short("t")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1.3852048812993896,0.012622046088551223")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse zoom target"))
                .help("Point to zoom toward"),
        )
        .arg(
            Arg::with_name(ZOOM_SPEED)
                .long(ZOOM_SPEED)
                .short("z")
                .takes_value(true)
                .default_value("0.2")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        1.0 - std::f64::EPSILON,
                        "Could not parse zoom speed",
                        "Zoom speed must be strictly between 0 and 1",
                    )
                })
                .help("Fraction of the distance to the target covered each frame"),
        )
        .arg(
            Arg::with_name(ITERATION_STEP)
                .long(ITERATION_STEP)
                .short("k")
                .takes_value(true)
                .default_value("5")
                .validator(|s| {
                    validate_range(
                        &s,
                        0.0,
                        1_000_000.0,
                        "Could not parse iteration step",
                        "Iteration step must be between 0 and 1000000",
                    )
                })
                .help("Iterations added to the budget each frame"),
        )
        .arg(
            Arg::with_name(BAND_ROWS)
                .long(BAND_ROWS)
                .short("b")
                .takes_value(true)
                .default_value("400")
                .validator(|s| {
                    validate_range(
                        &s,
                        1u32,
                        65_535,
                        "Could not parse band size",
                        "Band size must be between 1 and 65535",
                    )
                })
                .help("Rows per unit of compute work"),
        )
        .arg(worker_arg(
            FRAME_WORKERS,
            "Number of frame workers [default: half the cores]",
        ))
        .arg(worker_arg(
            COMPUTE_WORKERS,
            "Number of compute workers [default: one per core]",
        ))
}

fn worker_arg<'a, 'b>(name: &'a str, help: &'b str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .validator(|s| {
            validate_range(
                &s,
                1usize,
                4096,
                "Could not parse worker count",
                "Worker count must be between 1 and 4096",
            )
        })
        .help(help)
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Error> {
    matches
        .value_of(name)
        .ok_or_else(|| format_err!("missing value for --{}", name))
}

fn number<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    let raw = value(matches, name)?;
    T::from_str(raw).map_err(|_| format_err!("could not parse --{} {}", name, raw))
}

fn complex(matches: &ArgMatches, name: &str) -> Result<Complex<f64>, Error> {
    let raw = value(matches, name)?;
    parse_complex(raw).ok_or_else(|| format_err!("could not parse --{} {}", name, raw))
}

fn config_from(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let ratio = value(matches, RATIO)?;
    let workers = |name: &str| -> Result<Option<usize>, Error> {
        match matches.value_of(name) {
            Some(_) => number(matches, name).map(Some),
            None => Ok(None),
        }
    };
    Ok(RenderConfig {
        height: number(matches, HEIGHT)?,
        aspect_ratio: parse_ratio(ratio)
            .ok_or_else(|| format_err!("could not parse --{} {}", RATIO, ratio))?,
        origin: complex(matches, ORIGIN)?,
        max_iterations: number(matches, ITERATIONS)?,
        total_frames: number(matches, FRAMES)?,
        start_frame: number(matches, START_FRAME)?,
        target: complex(matches, TARGET)?,
        zoom_speed: number(matches, ZOOM_SPEED)?,
        iteration_step: number(matches, ITERATION_STEP)?,
        band_rows: number(matches, BAND_ROWS)?,
        output: PathBuf::from(value(matches, OUTPUT)?),
        frame_workers: workers(FRAME_WORKERS)?,
        compute_workers: workers(COMPUTE_WORKERS)?,
    })
}

fn render(config: RenderConfig) -> Result<usize, Error> {
    let sink = PngSink::new(&config.output)?;
    let scheduler = Scheduler::new(config)?;
    let config = scheduler.config();
    let bounds = config.initial_bounds()?;
    info!(
        "Resolution {}x{} r={}",
        config.width(),
        config.height,
        config.aspect_ratio
    );
    info!("startR {} endR {}", bounds.start().re, bounds.end().re);
    info!("startI {} endI {}", bounds.start().im, bounds.end().im);
    scheduler.run(&sink)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = app().get_matches();
    let outcome = config_from(&matches).and_then(render);
    if let Err(e) = outcome {
        eprintln!("Render failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_parse() {
        assert_eq!(parse_pair::<u32>("16:9", ':'), Some((16, 9)));
        assert_eq!(parse_pair::<u32>("16x", 'x'), None);
        assert_eq!(
            parse_complex("-1.5,0.25"),
            Some(Complex { re: -1.5, im: 0.25 })
        );
    }

    #[test]
    fn ratios_parse() {
        assert_eq!(parse_ratio("4:2"), Some(2.0));
        assert_eq!(parse_ratio("1.5"), Some(1.5));
        assert_eq!(parse_ratio("4:0"), None);
        assert_eq!(parse_ratio("wide"), None);
    }

    #[test]
    fn ranges_validate() {
        assert!(validate_range("0.5", 0.0, 1.0, "nan", "range").is_ok());
        assert_eq!(
            validate_range("2", 0u32, 1, "nan", "range"),
            Err("range".to_string())
        );
        assert_eq!(
            validate_range::<u32>("x", 0, 1, "nan", "range"),
            Err("nan".to_string())
        );
    }

    #[test]
    fn command_line_defaults_match_the_library() {
        let matches = app().get_matches_from(vec!["mandelzoom"]);
        assert_eq!(config_from(&matches).unwrap(), RenderConfig::default());
    }

    #[test]
    fn flags_reach_the_config() {
        let matches = app().get_matches_from(vec![
            "mandelzoom",
            "--height",
            "90",
            "--ratio",
            "4:3",
            "--target",
            "-0.75,0.1",
            "--start-frame",
            "3",
            "--compute-workers",
            "2",
        ]);
        let config = config_from(&matches).unwrap();
        assert_eq!(config.width(), 120);
        assert_eq!(config.target, Complex::new(-0.75, 0.1));
        assert_eq!(config.start_frame, 3);
        assert_eq!(config.compute_workers, Some(2));
        assert_eq!(config.frame_workers, None);
    }
}
