//! CrossSpec CLI - Command-line interface for specification-to-code traceability.

use clap::Parser;
use crossspec_cli::commands;
use crossspec_cli::{init_tracing, Cli, Command, Config, Formatter};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> crossspec_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::CodeExtract(args) => commands::execute_code_extract(args, &config, &formatter),
        Command::Import(args) => commands::execute_import(args, &config, &formatter),
        Command::Search(args) => commands::execute_search(args, &config, &formatter),
        Command::Show(args) => commands::execute_show(args, &config, &formatter),
        Command::Trace(args) => commands::execute_trace(args, &config, &formatter),
        Command::Plan(args) => commands::execute_plan(args, &config, &formatter),
        Command::Coverage(args) => commands::execute_coverage(args, &config, &formatter),
    }
}
