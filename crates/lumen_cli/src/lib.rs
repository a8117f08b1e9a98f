//! Command-line front end for the lumen compiler.
//!
//! Three subcommands, each a thin wrapper around one pipeline stage:
//! `tokens` dumps the scanner's output, `tree` dumps the parser's AST, and
//! `check` runs the full pipeline (`lumen::compile`) and prints whatever
//! diagnostics it collected. None of these produce an executable — code
//! generation is out of scope for this front end.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lumen_base::SourceMap;
use lumen_diagnostics::{Emitter, Reporter};
use lumen_parser::{ParseMode, Parser as LumenParser};
use lumen_syntax::{scan, OperatorTable};

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "The lumen compiler front end", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a file and print one line per token.
    Tokens {
        /// Path to a `.lum` source file.
        file: PathBuf,
    },
    /// Parse a file and print its declaration tree.
    Tree {
        /// Path to a `.lum` source file.
        file: PathBuf,
    },
    /// Resolve a package starting from an entry module and print diagnostics.
    Check {
        /// Dotted name of the entry module, e.g. `Main`.
        entry: String,
        /// Directory inside (or above) the package to resolve from.
        /// Defaults to the current directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Tokens { file } => cmd_tokens(&file),
        Commands::Tree { file } => cmd_tree(&file),
        Commands::Check { entry, dir } => cmd_check(&entry, dir),
    }
}

fn cmd_tokens(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut source_map = SourceMap::new();
    let source = source_map.load(file)?;
    let tokens = scan(source.text());
    log::debug!("scanned {} tokens from {}", tokens.len(), file.display());
    for token in &tokens {
        let line_pos = source_map.line_pos(file, token.position)?;
        println!(
            "LINE: {} POS: {} TYPE: {:?} {}",
            line_pos.line, token.position, token.kind, token.lexeme
        );
    }
    Ok(())
}

fn cmd_tree(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut source_map = SourceMap::new();
    let source = source_map.load(file)?;
    let tokens = scan(source.text());
    let mut reporter = Reporter::new();
    let mut operators = OperatorTable::with_builtins();
    let parser = LumenParser::new(&source_map, file.clone(), tokens, &mut reporter, &mut operators, ParseMode::FullParse);
    let module = parser.parse_module();

    println!("module {}", module.name);
    if let Some(decl) = &module.module_decl {
        println!("{:#?}", decl);
    }
    println!("imports:");
    for import in &module.imports {
        println!("{:#?}", import);
    }
    println!("declarations:");
    for decl in &module.declarations {
        println!("{:#?}", decl);
    }

    if !reporter.is_ok() {
        print_diagnostics(&reporter, &source_map);
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_check(entry: &str, dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let start = dir.unwrap_or(std::env::current_dir()?);
    log::info!("checking package at {} from entry module {}", start.display(), entry);
    let compilation = lumen::compile(&start, entry)?;

    print_diagnostics(&compilation.reporter, &compilation.source_map);

    if compilation.is_ok() {
        println!("Check passed ({} modules)", compilation.resolved.order.len());
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn print_diagnostics(reporter: &Reporter, source_map: &SourceMap) {
    print!("{}", Emitter::new().plain_text(reporter, source_map));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn tokens_on_a_minimal_module_does_not_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "module Main exposing (..)\nx = 1\n").unwrap();
        let path = tmp.path().to_path_buf();
        cmd_tokens(&path).unwrap();
    }

    #[test]
    fn tree_on_a_minimal_module_does_not_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "module Main exposing (..)\nx = 1\n").unwrap();
        let path = tmp.path().to_path_buf();
        cmd_tree(&path).unwrap();
    }
}
