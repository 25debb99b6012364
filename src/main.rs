// Steplet: a stepping script interpreter with live variable visualization

mod interpreter;
mod runtime;
mod samples;
mod script;
mod snapshot;
mod ui;

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use script::Script;
use ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    let (source, script_name) = if args.len() < 2 {
        // No file given: open the bundled array-sum demo
        (
            samples::ARRAY_SUM.source.to_string(),
            samples::ARRAY_SUM.name.to_string(),
        )
    } else {
        let script_file = &args[1];

        if script_file == "--help" || script_file == "-h" {
            let program_name = args.get(0).map(|s| s.as_str()).unwrap_or("steplet");
            println!("Usage: {} [file]", program_name);
            println!();
            println!("Run without arguments to open the bundled array-sum demo,");
            println!("or pass a script file to load your own.");
            println!();
            println!("Keys: r run, c cancel, 1-4 demos, +/- speed, arrows review, q quit");
            return Ok(());
        }

        if !Path::new(script_file).exists() {
            let program_name = args.get(0).map(|s| s.as_str()).unwrap_or("steplet");
            eprintln!("Error: File '{}' not found", script_file);
            eprintln!();
            eprintln!("Usage: {} [file]", program_name);
            eprintln!();
            eprintln!("Run without arguments to open the bundled array-sum demo,");
            eprintln!("or pass a script file to load your own.");
            std::process::exit(1);
        }

        (fs::read_to_string(script_file)?, script_file.clone())
    };

    let script = match Script::parse(&source) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Script error: {}", e);
            std::process::exit(1);
        }
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(script, script_name);
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
