extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate newton;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use newton::{parse_root, FractalProducer, Pretty, SolverConfig, ThreadedExecutor, Window};
use num::Complex;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Split `s` at the first `separator` and read both halves as `T`.
/// Whitespace around either half is ignored, so "800 x 600" and
/// "-1.5, 2" both work.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let index = s.find(separator)?;
    let left = s[..index].trim().parse().ok()?;
    let right = s[index + separator.len_utf8()..].trim().parse().ok()?;
    Some((left, right))
}

/// A window corner given as "re,im".
fn parse_corner(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex::new(re, im))
}

fn check_pair<T: FromStr>(s: &str, separator: char, complaint: &str) -> Result<(), String> {
    parse_pair::<T>(s, separator)
        .map(|_| ())
        .ok_or_else(|| complaint.to_string())
}

fn check_bounded(s: &str, low: usize, high: usize, what: &str) -> Result<(), String> {
    let n = usize::from_str(s.trim()).map_err(|_| format!("Could not parse {}", what.to_lowercase()))?;
    if n < low || n > high {
        return Err(format!("{} must be between {} and {}", what, low, high));
    }
    Ok(())
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const BAND_HEIGHT: &str = "band-height";
const ROOT: &str = "root";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("newt")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Newton fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| check_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,-2.0")
                .validator(|s| check_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the complex window"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2.0,2.0")
                .validator(|s| check_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the complex window"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| check_bounded(&s, 1, max_threads, "Thread count"))
                .help("Number of threads to use in solver (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1024")
                .validator(|s| check_bounded(&s, 1, 100_000, "Iteration count"))
                .help("Maximum Newton steps per pixel"),
        )
        .arg(
            Arg::with_name(BAND_HEIGHT)
                .required(false)
                .long(BAND_HEIGHT)
                .short("b")
                .takes_value(true)
                .default_value("64")
                .validator(|s| check_bounded(&s, 1, 65_535, "Band height"))
                .help("Rows per unit of work"),
        )
        .arg(
            Arg::with_name(ROOT)
                .required(true)
                .long(ROOT)
                .short("z")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .allow_hyphen_values(true)
                .help("A root of the polynomial, e.g. 1, -i, \"1 - i2\"; at least two"),
        )
        .get_matches()
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::Gray(8))?;
    Ok(())
}

/// Spread the root indices over the gray scale; no root is black.
fn shade(indices: &[u16], roots: usize) -> Vec<u8> {
    indices
        .iter()
        .map(|&i| ((i as usize) * 255 / roots.max(1)) as u8)
        .collect()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let size: (usize, usize) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair(s, 'x'))
        .ok_or_else(|| format_err!("Error parsing image dimensions"))?;
    let leftlower = matches
        .value_of(LEFTLOWER)
        .and_then(parse_corner)
        .ok_or_else(|| format_err!("Error parsing left lower point"))?;
    let rightupper = matches
        .value_of(RIGHTUPPER)
        .and_then(parse_corner)
        .ok_or_else(|| format_err!("Error parsing right upper point"))?;
    let threads = match matches.value_of(THREADS) {
        Some(t) => usize::from_str(t.trim())?,
        None => num_cpus::get(),
    };
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap_or("1024").trim())?;
    let band_height = usize::from_str(matches.value_of(BAND_HEIGHT).unwrap_or("64").trim())?;

    let roots = matches
        .values_of(ROOT)
        .map(|values| values.map(parse_root).collect::<Result<Vec<_>, _>>())
        .unwrap_or_else(|| Ok(vec![]))?;
    if roots.len() < 2 {
        bail!("You must enter at least two roots");
    }
    info!(
        "Roots: {}",
        roots
            .iter()
            .map(|r| Pretty(*r).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let window = Window::from_corners(leftlower, rightupper)?;
    let config = SolverConfig::default()
        .with_iteration_limit(iterations)
        .with_band_height(band_height);
    let producer = FractalProducer::new(roots, config, ThreadedExecutor::new(threads))?;
    let rendering = producer.produce(window, size.0, size.1, 0)?;
    if !rendering.failed_bands.is_empty() {
        warn!("Rows left blank: {:?}", rendering.failed_bands);
    }

    let outfile = matches
        .value_of(OUTPUT)
        .ok_or_else(|| format_err!("No output file"))?;
    write_image(outfile, &shade(&rendering.indices, rendering.roots), size)
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
