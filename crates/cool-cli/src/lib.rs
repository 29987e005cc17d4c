//! `coolgen` driver
//!
//! Reads the annotated program the front end wrote as JSON, lowers it with
//! `cool-cgen` and writes SPIM assembly next to the input (or wherever `-o`
//! points). `--dump-layout` prints the class layout table instead.

pub mod config;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use cool_ast::Program;
use cool_cgen::{ClassTable, CodeGenerator, CodegenOptions, GcMode, Listing};
use tracing::{debug, info};

use crate::config::{ConfigFile, Overrides};

#[derive(Parser, Debug)]
#[command(name = "coolgen")]
#[command(about = "Generate SPIM assembly from an annotated Cool program", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Annotated program (JSON)
    pub input: PathBuf,

    /// Output file; `-` writes to stdout. Defaults to the input with a `.s` extension
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Garbage collector: none, generational or stop-and-copy
    #[arg(long, value_name = "MODE")]
    pub gc: Option<GcMode>,

    /// Collect on every allocation
    #[arg(long)]
    pub gc_test: bool,

    /// Configuration file with a [codegen] table
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the class layout table and exit
    #[arg(long)]
    pub dump_layout: bool,

    /// When to use colors: auto, always or never
    #[arg(long, value_name = "WHEN", value_parser = ["auto", "always", "never"])]
    pub color: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Options after merging the config file with the flags
    pub fn options(&self) -> anyhow::Result<CodegenOptions> {
        let file = self
            .config
            .as_deref()
            .map(ConfigFile::from_file)
            .transpose()?;
        let overrides = Overrides {
            collector: self.gc,
            gc_test: self.gc_test,
        };
        Ok(config::resolve(file.as_ref(), overrides))
    }

    /// Where the assembly goes; `None` means stdout
    pub fn output_path(&self) -> Option<PathBuf> {
        match &self.output {
            Some(path) if path.as_os_str() == "-" => None,
            Some(path) => Some(path.clone()),
            None => Some(self.input.with_extension("s")),
        }
    }
}

/// What a run produced
#[derive(Debug)]
pub enum Outcome {
    /// Assembly written to a file
    Written(PathBuf),
    /// Assembly or layout printed to stdout
    Printed,
}

/// Read a program from its JSON form
pub fn load_program(path: &Path) -> anyhow::Result<Program> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse program {}", path.display()))
}

/// Generate the listing for a program
pub fn generate(program: &Program, options: CodegenOptions) -> anyhow::Result<Listing> {
    let mut listing = Listing::new();
    CodeGenerator::new(options)
        .generate(program, &mut listing)
        .context("code generation failed")?;
    Ok(listing)
}

/// Render the class layout table of a program
pub fn dump_layout(program: &Program) -> anyhow::Result<String> {
    let table = ClassTable::new(program).context("failed to build class table")?;
    Ok(table.to_string())
}

pub fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    let options = cli.options()?;
    let program = load_program(&cli.input)?;
    debug!(classes = program.classes.len(), "loaded {}", cli.input.display());

    if cli.dump_layout {
        print!("{}", dump_layout(&program)?);
        return Ok(Outcome::Printed);
    }

    info!(collector = %options.collector, gc_test = options.gc_test, "generating code");
    let text = generate(&program, options)?.render();

    match cli.output_path() {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(Outcome::Written(path))
        }
        None => {
            print!("{}", text);
            Ok(Outcome::Printed)
        }
    }
}
