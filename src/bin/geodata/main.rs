//! GeoData CLI - Tool for inspecting, slicing and regridding GeoData archives.

use geodata::prelude::*;
use geodata::serialize::Hierarchy;
use ndarray::Array2;
use std::env;
use std::path::Path;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(level: &str) {
    // RUST_LOG wins over the verbosity flags.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "warn",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Info command - show container summary
        "info" | "i" => {
            if filtered_args.len() < 2 {
                usage("missing file argument", "geodata info <file> [--json]");
            }
            let json = filtered_args[2..].iter().any(|&s| s == "--json" || s == "-j");
            cmd_info(filtered_args[1], json)
        }

        // Tree command - show archive groups and leaves
        "tree" | "t" => {
            if filtered_args.len() < 2 {
                usage("missing file argument", "geodata tree <file>");
            }
            cmd_tree(filtered_args[1])
        }

        // Slice command - keep selected time bins
        "slice" | "s" => {
            if filtered_args.len() < 5 {
                usage(
                    "missing arguments",
                    "geodata slice <in> <out> (--indices i,j,.. | --times t,u,..)",
                );
            }
            cmd_slice(filtered_args[1], filtered_args[2], filtered_args[3], filtered_args[4])
        }

        // Regrid command - interpolate onto new locations
        "regrid" | "r" => {
            if filtered_args.len() < 5 {
                usage(
                    "missing arguments",
                    "geodata regrid <in> <out> <locations.txt> <coordsys> [--method m] [--fill v]",
                );
            }
            cmd_regrid(&filtered_args[1..])
        }

        // Version
        "version" | "-V" | "--version" => {
            println!(
                "geodata {} (built {} {})",
                env!("CARGO_PKG_VERSION"),
                env!("GEODATA_BUILD_DATE"),
                env!("GEODATA_BUILD_TIME")
            );
            Ok(())
        }

        // Help
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_info(filtered_args[0], false)
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn usage(message: &str, usage: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("Usage: {}", usage);
    std::process::exit(1);
}

fn print_help() {
    println!("geodata - GeoData archive toolkit");
    println!();
    println!("USAGE:");
    println!("    geodata [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file> [--json]                 Show container summary");
    println!("    t, tree   <file>                          Show archive groups and arrays");
    println!("    s, slice  <in> <out> --indices i,j        Keep time bins by index");
    println!("    s, slice  <in> <out> --times t,u          Keep time bins by start time");
    println!("    r, regrid <in> <out> <locs> <coordsys>    Interpolate onto new locations");
    println!("              [--method linear|nearest|cubic] [--fill value]");
    println!("    version                                   Show version and build date");
    println!("    h, help                                   Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show warnings and errors");
    println!();
    println!("EXAMPLES:");
    println!("    geodata info scan.geo                              # Quick overview");
    println!("    geodata slice scan.geo first.geo --indices 0       # First time bin");
    println!("    geodata regrid scan.geo grid.geo grid.txt Cartesian --method nearest");
    println!();
    println!("NOTES:");
    println!("    - Passing a file directly is equivalent to 'info'");
    println!("    - Location files hold one point per line, comma or space separated");
    println!("    - RUST_LOG overrides the verbosity flags");
}

fn cmd_info(path: &str, json: bool) -> Result<()> {
    tracing::info!("Opening archive: {}", path);
    let gd = GeoData::read_h5(path)?;

    if json {
        let fields: serde_json::Map<String, serde_json::Value> = gd
            .values()
            .iter()
            .map(|(name, array)| (name.clone(), serde_json::json!(array.shape())))
            .collect();
        let attributes: Vec<&str> = gd.attributes().keys().map(String::as_str).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "file": path,
                "coordinate_system": gd.coordinate_system().as_str(),
                "locations": gd.num_locations(),
                "times": gd.num_times(),
                "sensor_location": gd.sensor_location().to_f64().iter().copied().collect::<Vec<f64>>(),
                "fields": fields,
                "attributes": attributes,
            }))
            .map_err(|e| Error::other(e.to_string()))?
        );
        return Ok(());
    }

    println!("Archive: {}", path);
    println!("Coordinates: {}", gd.coordinate_system());
    println!("Locations: {}", gd.num_locations());
    println!("Times: {} {:?}", gd.num_times(), gd.times().shape());
    println!();
    println!("Fields ({}):", gd.values().len());
    for (name, array) in gd.values() {
        println!("  {:<16} {} {:?}", name, array.element_type(), array.shape());
    }
    if !gd.attributes().is_empty() {
        println!();
        println!("Attributes ({}):", gd.attributes().len());
        for (name, array) in gd.attributes() {
            println!("  {:<16} {} {:?}", name, array.element_type(), array.shape());
        }
    }
    Ok(())
}

fn cmd_tree(path: &str) -> Result<()> {
    tracing::info!("Opening archive: {}", path);
    let hierarchy = Hierarchy::read(path)?;

    println!("Archive: {}", path);
    println!();
    for group in hierarchy.groups() {
        let depth = group.components().len();
        println!("{}{}", "  ".repeat(depth), group.path);
        for (name, leaf) in &group.leaves {
            println!("{}  {} = {}", "  ".repeat(depth), name, leaf);
        }
    }
    Ok(())
}

fn cmd_slice(input: &str, output: &str, flag: &str, list: &str) -> Result<()> {
    let kind = match flag {
        "--indices" | "-i" => "Array",
        "--times" | "-t" => "Time",
        other => return Err(Error::argument(format!("expected --indices or --times, got '{}'", other))),
    };
    let values = parse_list(list)?;
    let selector = TimeSelector::parse(Some(kind), &values)?;

    tracing::info!("Opening archive: {}", input);
    let gd = GeoData::read_h5(input)?;
    let sliced = gd.timeslice(&selector)?;
    tracing::debug!("Kept {} of {} time bins", sliced.num_times(), gd.num_times());

    sliced.write_h5(output)?;
    tracing::info!("Wrote {}", output);
    Ok(())
}

fn cmd_regrid(args: &[&str]) -> Result<()> {
    let (input, output, locations, system) = (args[0], args[1], args[2], args[3]);
    let mut method = Method::default();
    let mut fill = f64::NAN;

    let mut rest = args[4..].iter();
    while let Some(&flag) = rest.next() {
        let value = rest
            .next()
            .ok_or_else(|| Error::argument(format!("missing value for {}", flag)))?;
        match flag {
            "--method" | "-m" => method = value.parse()?,
            "--fill" | "-f" => {
                fill = value
                    .parse()
                    .map_err(|_| Error::argument(format!("invalid fill value '{}'", value)))?
            }
            other => return Err(Error::argument(format!("unknown option '{}'", other))),
        }
    }

    let system: CoordinateSystem = system.parse()?;
    let points = read_locations(locations)?;
    tracing::debug!("Read {} target locations from {}", points.nrows(), locations);

    tracing::info!("Opening archive: {}", input);
    let gd = GeoData::read_h5(input)?;
    let regridded = gd.interpolate(points.view(), &system, method, fill)?;

    regridded.write_h5(output)?;
    tracing::info!("Wrote {} ({} locations, {})", output, regridded.num_locations(), method);
    Ok(())
}

fn parse_list(list: &str) -> Result<Vec<f64>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| Error::argument(format!("invalid number '{}'", s)))
        })
        .collect()
}

/// One point per non-empty line; `#` starts a comment.
fn read_locations(path: &str) -> Result<Array2<f64>> {
    let text = std::fs::read_to_string(path)?;
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|_| Error::argument(format!("{}:{}: invalid number '{}'", path, lineno + 1, s)))
            })
            .collect::<Result<Vec<f64>>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(Error::argument(format!(
                    "{}:{}: expected {} coordinates, got {}",
                    path,
                    lineno + 1,
                    first.len(),
                    row.len()
                )));
            }
        }
        rows.push(row);
    }

    let ncols = rows.first().map_or(0, Vec::len);
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), ncols), flat).map_err(|e| Error::other(e.to_string()))
}
