mod cli;

use std::io::BufRead;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;

use cky::bnf::{CompileError, CompileErrorType};
use cky::error_handling::Location;
use cky::{bnf, error_handling, generator, Chart, ChartParser, Grammar, Symbol};
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let grammar = match bnf::parse_file(&cli.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            error_handling::report(&errors);
            return ExitCode::FAILURE;
        }
    };
    let start = match start_symbol(cli.start.as_deref(), &grammar, &cli.file) {
        Ok(start) => start,
        Err(error) => {
            error_handling::report(&[error]);
            return ExitCode::FAILURE;
        }
    };

    if cli.print_grammar {
        print!("{}", grammar.store);
        return ExitCode::SUCCESS;
    }

    if let Some(amount) = cli.generate {
        let mut rng = rand::thread_rng();
        for _ in 0..amount {
            match generator::generate_from(&grammar.store, &start, &mut rng, cli.max_depth) {
                Ok(sentence) => println!("{}", sentence.iter().join(" ")),
                Err(error) => eprintln!("{}", error),
            }
        }
        return ExitCode::SUCCESS;
    }

    let parser = ChartParser::new(&grammar.store);
    if cli.sentences.is_empty() {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => parse_sentence(&parser, &start, &line, &cli),
                Err(error) => {
                    eprintln!("Could not read stdin: {}", error);
                    return ExitCode::FAILURE;
                }
            }
        }
    } else {
        for sentence in &cli.sentences {
            parse_sentence(&parser, &start, sentence, &cli);
        }
    }

    ExitCode::SUCCESS
}

// The `--start` override must name a nonterminal the grammar defines
fn start_symbol(name: Option<&str>, grammar: &Grammar, file: &Path) -> Result<Symbol, CompileError> {
    let Some(name) = name else {
        return Ok(grammar.start_symbol.clone());
    };
    let start = Symbol::from(name);
    if grammar.store.defines(&start) {
        Ok(start)
    } else {
        Err(CompileError {
            location: Location::file(file),
            error: CompileErrorType::UndefinedNonterminal(name.to_string())
        })
    }
}

// Tokens are whatever whitespace separates
fn parse_sentence(parser: &ChartParser, start: &Symbol, sentence: &str, cli: &Cli) {
    let tokens = sentence.split_whitespace().collect_vec();
    let chart = match parser.parse(&tokens) {
        Ok(chart) => chart,
        Err(error) => {
            eprintln!("{}", error);
            return;
        }
    };

    println!("{}", tokens.iter().join(" "));
    if cli.chart {
        print_chart(&chart);
    }
    for (position, token) in chart.unknown_terminals() {
        println!("  word not in lexicon: `{}` (position {})", token, position);
    }

    let parses = chart.parses(start);
    if parses.is_empty() {
        println!("  no parse");
    }
    for (number, tree) in parses.iter().enumerate() {
        if cli.pretty {
            println!("  parse {}:", number + 1);
            for line in tree.pretty().lines() {
                println!("    {}", line);
            }
        } else {
            println!("  {}: {}", number + 1, tree);
        }
    }
}

fn print_chart(chart: &Chart) {
    for (start, end, cell) in chart.spans() {
        if cell.is_empty() {
            continue;
        }
        let labels = cell.iter().filter_map(|&id| chart.node(id)).map(|node| node.label()).join(" ");
        println!("  [{}, {}] {}", start, end, labels);
    }
}
