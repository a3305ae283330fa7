extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate regex;
extern crate term_grid;

pub mod frontend;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::io::{self, Write};
use std::path::Path;

use frontend::ir::IrNode;
use frontend::lexer;

/// What to do with the input file. When several mode flags are given
/// the most thorough one wins: `-r` over `-p` over `-s`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Mode {
    Scan,
    Parse,
    Ir,
}

impl Mode {
    fn from_args(args: &ArgMatches) -> Mode {
        if args.is_present("ir") {
            Mode::Ir
        } else if args.is_present("parse") {
            Mode::Parse
        } else if args.is_present("scan") {
            Mode::Scan
        } else {
            Mode::Parse
        }
    }
}

fn main() {
    let args = build_cli().get_matches();
    initialize_logging(args.occurrences_of("verbose"));

    let mode = Mode::from_args(&args);
    let table = args.is_present("table");
    let ifile = args.value_of("INPUT").unwrap_or_default();

    debug!("Arguments:\n\tVerbosity: {}\n\tMode: {:?}\n\tTable: {}\n\tInfile: {}",
        verbosity(args.occurrences_of("verbose")),
        mode,
        table,
        ifile
    );

    let ipath = Path::new(ifile);
    let source = match std::fs::read_to_string(&ipath) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(source) => source,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(mode, table, &source, &mut out) {
        Ok(true) => {},
        Ok(false) => std::process::exit(1),
        Err(err) => {
            error!("fatal: unable to write output: {}", err);
            std::process::exit(1);
        },
    }
}

/// Runs the front end over `source` and writes the result for `mode`.
/// Returns false if any diagnostic was reported.
fn run<W: Write>(mode: Mode, table: bool, source: &str, out: &mut W) -> io::Result<bool> {
    if mode == Mode::Scan {
        let mut diagnostics = Vec::new();
        let tokens = lexer::tokenize(source, &mut diagnostics);
        for diagnostic in diagnostics.iter() {
            writeln!(out, "{}", diagnostic)?;
        }
        for token in tokens.iter() {
            writeln!(out, "{}", token)?;
        }
        return Ok(diagnostics.is_empty());
    }

    let analysis = frontend::analyze(source);
    if !analysis.diagnostics.is_empty() {
        info!("Rejected program with {} error(s).", analysis.diagnostics.len());
        for diagnostic in analysis.diagnostics.iter() {
            writeln!(out, "{}", diagnostic)?;
        }
        return Ok(false);
    }

    info!("Accepted program with {} instruction(s).", analysis.ir.len());
    match mode {
        Mode::Ir if table => {
            if !analysis.ir.is_empty() {
                write!(out, "{}", render_table(&analysis.ir))?;
            }
        },
        Mode::Ir => {
            for node in analysis.ir.iter() {
                writeln!(out, "{}", node)?;
            }
        },
        _ => writeln!(out, "VALID ILOC PROGRAM")?,
    }
    Ok(true)
}

/// One row per instruction: line, opcode, sources, arrow, destination.
fn render_table(ir: &[IrNode]) -> String {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for node in ir.iter() {
        let dest = node.instruction.destination();
        grid.add(Cell::from(format!("{}:", node.line)));
        grid.add(Cell::from(node.opcode().name().to_string()));
        grid.add(Cell::from(node.instruction.sources().join(", ")));
        grid.add(Cell::from((if dest.is_some() { "=>" } else { "" }).to_string()));
        grid.add(Cell::from(dest.unwrap_or("").to_string()));
    }

    grid.fit_into_columns(5).to_string()
}

fn build_cli() -> App<'static, 'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("INPUT")
            .help("Sets the ILOC source file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("scan")
            .short("s")
            .takes_value(false)
            .help("scan and print tokens"))
        .arg(Arg::with_name("parse")
            .short("p")
            .takes_value(false)
            .help("scan, parse, and report errors (default)"))
        .arg(Arg::with_name("ir")
            .short("r")
            .takes_value(false)
            .help("scan, parse, and print the IR"))
        .arg(Arg::with_name("table")
            .short("t")
            .long("table")
            .takes_value(false)
            .help("with -r, prints the IR as a compact table"))
}

fn verbosity(occurrences: u64) -> log::LevelFilter {
    match occurrences {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 | _ => log::LevelFilter::Debug,
    }
}

fn initialize_logging(occurrences: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(verbosity(occurrences))
        // stdout carries the program's own output.
        .chain(std::io::stderr())
        .apply().ok();
}
