//! nsdgen CLI - Structured-diagram code generator

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use nsdgen::diagram::{Block, DisplayMode};
use nsdgen::errors::print_error;
use nsdgen::lexer::classify;
use nsdgen::{
    generator_for, load_diagram, to_intermediate, GeneratorConfig, MarkerConfig, NsdResult, Root,
    Target,
};

#[derive(Parser, Debug)]
#[command(version, about = "Structured-diagram to source code generator", long_about = None)]
struct Cli {
    /// Show debug output (overrides the default level of RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate source code from a diagram
    Generate {
        /// Diagram file (JSON)
        file: PathBuf,
        /// Target notation
        #[arg(short, long)]
        target: String,
        /// Output file (defaults to <stem>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Marker and export settings (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the code instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Print the intermediate line of every text line
    Intermediate {
        /// Diagram file (JSON)
        file: PathBuf,
        /// Marker settings (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Split a line into classified lexemes
    Lex {
        /// The line to split
        text: String,
        /// Names to highlight as variables
        #[arg(long = "var")]
        variables: Vec<String>,
        /// Marker settings (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the available targets
    Targets,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Generate {
            file,
            target,
            output,
            config,
            stdout,
        } => generate(&file, &target, output, config.as_deref(), stdout),
        Command::Intermediate { file, config } => intermediate(&file, config.as_deref()),
        Command::Lex {
            text,
            variables,
            config,
        } => lex(&text, &variables, config.as_deref()),
        Command::Targets => {
            for target in Target::ALL {
                let syntax = target.syntax();
                println!(
                    "  {:<8} {:<8} {:<20} .{}",
                    target.name(),
                    syntax.title,
                    syntax.description,
                    syntax.extension
                );
            }
            ExitCode::SUCCESS
        }
    }
}

fn load_config(path: Option<&Path>) -> NsdResult<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_path(path),
        None => Ok(GeneratorConfig::default()),
    }
}

/// Read and validate a diagram, reporting failures; returns the source too
fn read_diagram(file: &Path) -> Option<(String, Root)> {
    let filename = file.display().to_string();
    let source = match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            return None;
        }
    };

    match load_diagram(&source) {
        Ok(root) => Some((source, root)),
        Err(e) => {
            print_error(&source, &filename, &e);
            None
        }
    }
}

fn generate(
    file: &Path,
    target: &str,
    output: Option<PathBuf>,
    config: Option<&Path>,
    stdout: bool,
) -> ExitCode {
    let target: Target = match target.parse() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            let names: Vec<_> = Target::ALL.iter().map(|t| t.name()).collect();
            eprintln!("Available targets: {}", names.join(", "));
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some((source, root)) = read_diagram(file) else {
        return ExitCode::FAILURE;
    };

    let mut generator = generator_for(target, config);
    let code = match generator.generate(&root) {
        Ok(code) => code,
        Err(e) => {
            print_error(&source, &file.display().to_string(), &e);
            return ExitCode::FAILURE;
        }
    };

    if stdout {
        print!("{}", code);
        return ExitCode::SUCCESS;
    }

    let output_path = output.unwrap_or_else(|| {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        PathBuf::from(format!("{}.{}", stem, generator.file_extension()))
    });

    match fs::write(&output_path, &code) {
        Ok(_) => {
            println!(
                "Generated: {} ({}, {} bytes)",
                output_path.display(),
                generator.description(),
                code.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing '{}': {}", output_path.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn intermediate(file: &Path, config: Option<&Path>) -> ExitCode {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some((_, root)) = read_diagram(file) else {
        return ExitCode::FAILURE;
    };

    print_intermediate(&root.children, &config.markers, 0);
    ExitCode::SUCCESS
}

fn print_intermediate(block: &Block, markers: &MarkerConfig, depth: usize) {
    for element in block {
        for line in element.lines(DisplayMode::Code) {
            println!(
                "{}{:<12}|{}|",
                "  ".repeat(depth),
                element.kind_name(),
                to_intermediate(line, markers)
            );
        }
        for child in element.children() {
            print_intermediate(child, markers, depth + 1);
        }
    }
}

fn lex(text: &str, variables: &[String], config: Option<&Path>) -> ExitCode {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for (lexeme, class) in classify(text, variables, &config.markers.io_markers()) {
        println!("{:<12} {:?}", class, lexeme);
    }
    ExitCode::SUCCESS
}
