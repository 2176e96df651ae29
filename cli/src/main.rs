use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::time::Instant;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "yamlite", version, about = "Strict YAML subset parser and emitter")]
struct Args {
    /// Input file path. Use '-' to read from stdin.
    input: String,

    /// Dump the parsed document as YAML. Default is the structural form.
    #[arg(short = 'd', long = "yaml")]
    dump_yaml: bool,

    /// Print parse/emit timing and memory statistics instead of the document.
    #[arg(short = 'n', long = "stats")]
    stats: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let input = read_input(&args.input)?;

    let initial_mem = resident_memory();
    let parse_start = Instant::now();
    let doc = yamlite::parse(&input)?;
    let parse_elapsed = parse_start.elapsed();

    if args.stats {
        let parse_mem = resident_memory();

        let yaml_start = Instant::now();
        let yaml = doc.as_yaml();
        let yaml_elapsed = yaml_start.elapsed();

        let py_start = Instant::now();
        let py = doc.as_py_struct(false);
        let py_elapsed = py_start.elapsed();
        drop((yaml, py));

        let bytes = input.len() as f64;
        let speed = |elapsed: std::time::Duration| bytes / (elapsed.as_micros().max(1) as f64);
        println!("  Document   : {:.1} KB", 0.001 * bytes);
        println!(
            "  Load speed : {:.3} MB/s ({:.3} ms)",
            speed(parse_elapsed),
            parse_elapsed.as_secs_f64() * 1e3
        );
        println!(
            "  Emit YAML  : {:.3} MB/s ({:.3} ms)",
            speed(yaml_elapsed),
            yaml_elapsed.as_secs_f64() * 1e3
        );
        println!(
            "  Emit Python: {:.3} MB/s ({:.3} ms)",
            speed(py_elapsed),
            py_elapsed.as_secs_f64() * 1e3
        );
        if let (Some(before), Some(after)) = (initial_mem, parse_mem) {
            let used = after.saturating_sub(before) as f64;
            println!(
                "  Mem factor : {:.1}x the input size ({:.1} MB)",
                used / bytes.max(1.0),
                1e-6 * used
            );
        }
        return Ok(());
    }

    if args.dump_yaml {
        println!("{}", doc.as_yaml());
    } else {
        println!("{}", doc.as_py_struct(true));
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String, Box<dyn Error>> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(input).map_err(|err| format!("unable to load the file '{input}': {err}").into())
}

/// Resident set size in bytes, where the platform exposes it.
fn resident_memory() -> Option<u64> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}
