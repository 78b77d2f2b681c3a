mod app;
mod args;

use anyhow::{Context, Result};
use app::App;
use args::{Export, Input};
use codeharvest_config::Config;
use codeharvest_engine::parsing::naming::sanitize_project_name;
use codeharvest_engine::{GeneratedProject, Parser, io};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Read, stdout};
use std::path::PathBuf;
use std::{env, process};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("codeharvest-cli");
    let args = match args::parse(argv.get(1..).unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", args::usage(program));
            process::exit(1);
        }
    };

    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from_path(&config_path) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    if args.config.is_some() && !config_path.exists() {
        log::warn!("Config file {} not found, using defaults", config_path.display());
    }

    let text = read_input(&args.input)?;
    let project = Parser::new(config.parser.clone()).generate(&text);
    log::info!(
        "Recovered {} file(s), project '{}' ({})",
        project.structure.files.len(),
        project.structure.name,
        project.structure.project_type
    );

    if let Some(export) = &args.export {
        let Some(dest) = export_destination(export, &config, &project.structure.name) else {
            eprintln!(
                "Error: --export needs a directory, or output_dir in '{}' and a usable project name",
                config_path.display()
            );
            process::exit(1);
        };
        if let Err(e) = io::validate_destination(&dest) {
            eprintln!("Error: Export path '{}' is invalid: {e}", dest.display());
            process::exit(1);
        }
        for path in io::write_project(&project.structure, &dest)? {
            println!("{}", path.display());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    }

    if args.interactive() {
        run_tui(project)?;
    }

    Ok(())
}

fn read_input(input: &Input) -> Result<String> {
    match input {
        Input::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read response from stdin")?;
            Ok(text)
        }
        Input::File(path) => io::read_response(path)
            .with_context(|| format!("Failed to read response '{}'", path.display())),
    }
}

/// Projects are written to `<dir>/<project name>` when the directory comes
/// from the config file, and straight into an explicit directory.
///
/// The project name always becomes a single folder below `output_dir`.
fn export_destination(export: &Export, config: &Config, project_name: &str) -> Option<PathBuf> {
    match export {
        Export::Dir(dir) => Some(dir.clone()),
        Export::ConfigDir => {
            let output_dir = config.output_dir.as_ref()?;
            let folder = sanitize_project_name(project_name, config.parser.max_filename_chars)?;
            Some(output_dir.join(folder))
        }
    }
}

fn run_tui(project: GeneratedProject) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(project);
    let res = app::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
