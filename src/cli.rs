// Command-line front end over the bdiff/mpatch engine.
//
// Mirrors the teacher's CLI texture: explicit subcommands, stdin/stdout
// fallback when a file argument is omitted, `-f`/`-q`/`-v`/`--json` global
// flags, and `eprintln!`-based error reporting with a `bdelta: <context>:`
// prefix rather than panicking.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::engine;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Line-granular binary diff/patch engine.
#[derive(Parser, Debug)]
#[command(name = "bdelta", version, about = "Line-granular binary diff/patch engine", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Emit summary stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compute the binary delta transforming source into target.
    Diff(DiffArgs),
    /// Print the matching-block list between two files.
    Blocks(BlocksArgs),
    /// Apply an ordered sequence of delta files to a source file.
    Patch(PatchArgs),
    /// Compute the size a single delta would produce, without applying it.
    Patchedsize(PatchedsizeArgs),
    /// Normalize whitespace in a file.
    Fixws(FixwsArgs),
}

#[derive(clap::Args, Debug)]
struct DiffArgs {
    /// Original file.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,
    /// Desired file.
    #[arg(value_hint = ValueHint::FilePath)]
    target: PathBuf,
    /// Write the delta here instead of stdout.
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct BlocksArgs {
    /// Original file.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,
    /// Desired file.
    #[arg(value_hint = ValueHint::FilePath)]
    target: PathBuf,
}

#[derive(clap::Args, Debug)]
struct PatchArgs {
    /// Original file.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,
    /// Delta files, applied in the order given.
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    deltas: Vec<PathBuf>,
    /// Write the patched output here instead of stdout.
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct PatchedsizeArgs {
    /// Original file.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,
    /// A single, already-folded delta file.
    #[arg(value_hint = ValueHint::FilePath)]
    delta: PathBuf,
}

#[derive(clap::Args, Debug)]
struct FixwsArgs {
    /// Input file (stdin if omitted).
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,
    /// Drop whitespace entirely instead of collapsing runs to one space.
    #[arg(long = "all")]
    all_ws: bool,
    /// Write the result here instead of stdout.
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn read_file(path: &std::path::Path, context: &str) -> Result<Vec<u8>, i32> {
    std::fs::read(path).map_err(|e| {
        eprintln!("bdelta: {context}: {}: {e}", path.display());
        1
    })
}

fn write_output(data: &[u8], output: Option<&PathBuf>, force: bool) -> i32 {
    match output {
        Some(path) => {
            if path.exists() && !force {
                eprintln!("bdelta: output file exists, use -f to overwrite: {}", path.display());
                return 1;
            }
            if let Err(e) = std::fs::write(path, data) {
                eprintln!("bdelta: write: {}: {e}", path.display());
                return 1;
            }
        }
        None => {
            if let Err(e) = io::stdout().write_all(data) {
                eprintln!("bdelta: write: stdout: {e}");
                return 1;
            }
        }
    }
    0
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_diff(cli: &Cli, args: &DiffArgs) -> i32 {
    let source = match read_file(&args.source, "source") {
        Ok(d) => d,
        Err(code) => return code,
    };
    let target = match read_file(&args.target, "target") {
        Ok(d) => d,
        Err(code) => return code,
    };

    let delta = match engine::bdiff(&source, &target) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("bdelta: diff: {e}");
            return 1;
        }
    };

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "bdelta: diff: {} bytes -> {} bytes, delta {} bytes",
            source.len(),
            target.len(),
            delta.len()
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "diff",
            "source_size": source.len(),
            "target_size": target.len(),
            "delta_size": delta.len(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    write_output(&delta, args.output.as_ref(), cli.force)
}

fn cmd_blocks(cli: &Cli, args: &BlocksArgs) -> i32 {
    let source = match read_file(&args.source, "source") {
        Ok(d) => d,
        Err(code) => return code,
    };
    let target = match read_file(&args.target, "target") {
        Ok(d) => d,
        Err(code) => return code,
    };

    let hunks = match engine::blocks(&source, &target) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("bdelta: blocks: {e}");
            return 1;
        }
    };

    if cli.json_output {
        let json: Vec<_> = hunks
            .iter()
            .map(|h| serde_json::json!({"a1": h.a1, "a2": h.a2, "b1": h.b1, "b2": h.b2}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else {
        for h in &hunks {
            println!("@@ a[{}..{}) b[{}..{}) @@", h.a1, h.a2, h.b1, h.b2);
        }
    }

    if cli.verbose > 0 && !cli.quiet {
        eprintln!("bdelta: blocks: {} hunks", hunks.len());
    }

    0
}

fn cmd_patch(cli: &Cli, args: &PatchArgs) -> i32 {
    let source = match read_file(&args.source, "source") {
        Ok(d) => d,
        Err(code) => return code,
    };

    let mut deltas = Vec::with_capacity(args.deltas.len());
    for path in &args.deltas {
        match read_file(path, "delta") {
            Ok(d) => deltas.push(d),
            Err(code) => return code,
        }
    }
    let delta_refs: Vec<&[u8]> = deltas.iter().map(|d| d.as_slice()).collect();

    let output = match engine::patches(&source, &delta_refs) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("bdelta: patch: {e}");
            return 1;
        }
    };

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "bdelta: patch: {} deltas applied, output {} bytes",
            args.deltas.len(),
            output.len()
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "patch",
            "source_size": source.len(),
            "deltas_applied": args.deltas.len(),
            "output_size": output.len(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    write_output(&output, args.output.as_ref(), cli.force)
}

fn cmd_patchedsize(_cli: &Cli, args: &PatchedsizeArgs) -> i32 {
    let source_len = match std::fs::metadata(&args.source) {
        Ok(m) => m.len() as usize,
        Err(e) => {
            eprintln!("bdelta: patchedsize: source: {}: {e}", args.source.display());
            return 1;
        }
    };
    let delta = match read_file(&args.delta, "delta") {
        Ok(d) => d,
        Err(code) => return code,
    };

    match engine::patchedsize(source_len, &delta) {
        Ok(size) => {
            println!("{size}");
            0
        }
        Err(e) => {
            eprintln!("bdelta: patchedsize: {e}");
            1
        }
    }
}

fn cmd_fixws(cli: &Cli, args: &FixwsArgs) -> i32 {
    let input = match &args.input {
        Some(path) => match read_file(path, "input") {
            Ok(d) => d,
            Err(code) => return code,
        },
        None => {
            let mut buf = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut buf) {
                eprintln!("bdelta: fixws: stdin: {e}");
                return 1;
            }
            buf
        }
    };

    let result = engine::fixws(&input, args.all_ws);

    if cli.verbose > 0 && !cli.quiet {
        eprintln!("bdelta: fixws: {} bytes -> {} bytes", input.len(), result.len());
    }

    write_output(&result, args.output.as_ref(), cli.force)
}

/// Exercise clap's argument parser without running a command, for fuzzing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv = std::iter::once("bdelta".to_string()).chain(args.iter().cloned());
    let _ = Cli::try_parse_from(argv);
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Cmd::Diff(args) => cmd_diff(&cli, args),
        Cmd::Blocks(args) => cmd_blocks(&cli, args),
        Cmd::Patch(args) => cmd_patch(&cli, args),
        Cmd::Patchedsize(args) => cmd_patchedsize(&cli, args),
        Cmd::Fixws(args) => cmd_fixws(&cli, args),
    };

    process::exit(exit_code);
}
