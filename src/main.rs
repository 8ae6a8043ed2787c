// PieTTY: Debuggable Piet Interpreter

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pietty::grid::Grid;
use pietty::interpreter::constants::DEFAULT_STEP_DELAY;
use pietty::interpreter::engine::{DebugSettings, Interpreter};
use pietty::ui::App;

/// Parsed command line
struct Options {
    program: String,
    headless: bool,
    delay: Duration,
    input: String,
    start_paused: bool,
}

fn usage(program_name: &str) {
    eprintln!("Usage: {} <program.txt> [options]", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --run            Run without the debugger (stdin/stdout as program IO)");
    eprintln!("  --delay <ms>     Pause between steps in the debugger (default {})", DEFAULT_STEP_DELAY.as_millis());
    eprintln!("  --input <text>   Program input for the debugger");
    eprintln!("  --paused         Start the debugger paused on the first step");
    eprintln!();
    eprintln!("Programs are written one row per line, codels separated by spaces:");
    eprintln!("  lR R dR ... (light/normal/dark red, yellow Y, green G, cyan C, blue B, magenta M)");
    eprintln!("  W (white), K (black), or #RRGGBB codes");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut program = None;
    let mut headless = false;
    let mut delay = DEFAULT_STEP_DELAY;
    let mut input = String::new();
    let mut start_paused = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--run" => headless = true,
            "--paused" => start_paused = true,
            "--delay" => {
                let value = iter.next().ok_or("--delay needs a value")?;
                let ms: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid delay '{}'", value))?;
                delay = Duration::from_millis(ms);
            }
            "--input" => {
                input = iter.next().ok_or("--input needs a value")?.clone();
            }
            other if other.starts_with("--") => return Err(format!("Unknown option '{}'", other)),
            other => {
                if program.is_some() {
                    return Err(format!("Unexpected argument '{}'", other));
                }
                program = Some(other.to_string());
            }
        }
    }

    Ok(Options {
        program: program.ok_or("No input file provided")?,
        headless,
        delay,
        input,
        start_paused,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("pietty");

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            usage(program_name);
            std::process::exit(1);
        }
    };

    if !Path::new(&options.program).exists() {
        eprintln!("Error: File '{}' not found", options.program);
        std::process::exit(1);
    }

    let source = fs::read_to_string(&options.program)?;
    let grid: Grid = match source.parse() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Grid error: {}", e);
            std::process::exit(1);
        }
    };

    if options.headless {
        // Logs go to stderr; stdout carries program output
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
        return run_headless(&grid);
    }

    let settings = DebugSettings {
        step_delay: options.delay,
        start_paused: options.start_paused,
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(grid, options.program.clone(), settings, options.input);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_headless(grid: &Grid) -> Result<(), Box<dyn std::error::Error>> {
    let interpreter = Interpreter::new();
    let stdout = io::stdout();
    let stdin = io::stdin();

    let result = interpreter.interpret(grid, stdout.lock(), stdin.lock());
    io::stdout().flush()?;

    match result {
        Ok(termination) => {
            log::info!(
                "{:?} after {} operations, stack {:?}",
                termination.reason,
                termination.operations,
                termination.stack
            );
            Ok(())
        }
        Err(fault) => {
            eprintln!("Interpreter fault: {}", fault);
            std::process::exit(2);
        }
    }
}
