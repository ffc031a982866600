/*
    This module loads grammars in Chomsky normal form from BNF files
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use crate::error_handling::*;
use crate::grammar::{Grammar, GrammarStore, Rule, RuleKey, Symbol};
use itertools::Itertools;
use lexer::*;
use verifier::verify_rules;

#[derive(Debug)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    MissingEquals,
    // A rule has multiple equals signs
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // There is an unclosed quote
    UnmatchedQuote,
    // An alternative with nothing in it
    EmptyAlternative,
    // A terminal with no text in it
    EmptyTerminal,
    // A terminal that sentence tokenization could never produce
    WhitespaceInTerminal(String),
    // An alternative that is neither two nonterminals nor a single terminal
    NotChomskyNormalForm(String),
    // An undefined nonterminal was used
    UndefinedNonterminal(String),
    // The file does not contain a single rule
    EmptyGrammar,
    // Somehow a full rewrite was parsed as a base alternative
    // This is a problem with cky, not the grammar
    UnsplitRewrite,
    // A blank line got too deep into the parser
    // This is a problem with cky, not the grammar
    UnexpectedBlankLine,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        use CompileErrorType::*;
        match (self, other) {
            (FileError(a), FileError(b)) => a.kind() == b.kind(),
            (WhitespaceInTerminal(a), WhitespaceInTerminal(b)) => a == b,
            (NotChomskyNormalForm(a), NotChomskyNormalForm(b)) => a == b,
            (UndefinedNonterminal(a), UndefinedNonterminal(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingEquals => write!(f, "Expected `=` after nonterminal"),
            CompileErrorType::UnexpectedEquals => write!(f, "Unexpected `=` encountered"),
            CompileErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            CompileErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            CompileErrorType::EmptyAlternative => write!(f, "Empty alternative (epsilon rules are not in Chomsky normal form)"),
            CompileErrorType::EmptyTerminal => write!(f, "Empty terminal (epsilon rules are not in Chomsky normal form)"),
            CompileErrorType::WhitespaceInTerminal(terminal) => write!(f, "Terminal \"{}\" contains whitespace, so no sentence token can match it", terminal),
            CompileErrorType::NotChomskyNormalForm(alternative) => write!(f, "`{}` is not in Chomsky normal form: expected two nonterminals or one terminal", alternative),
            CompileErrorType::UndefinedNonterminal(nonterminal) => write!(f, "Could not find definition for `{}`", nonterminal),
            CompileErrorType::EmptyGrammar => write!(f, "No rules found"),
            CompileErrorType::UnsplitRewrite => write!(f, "Rewrite was not fully split (this is a problem with cky, not the grammar)"),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a problem with cky, not the grammar)"),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> CompileError {
    CompileError {
        location: Location::file(file),
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

// The alternatives given for one nonterminal on one line of the file
#[derive(PartialEq, Debug)]
pub(crate) struct RuleLine {
    symbol: Symbol,
    alternatives: Vec<RuleKey>,
    location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<RuleKey> {
    match tokens {
        [Token::Nonterminal(left), Token::Nonterminal(right)] => Ok(RuleKey::Binary(left.into(), right.into())),
        [Token::Terminal(terminal)] if terminal.is_empty() => Err(CompileErrorType::EmptyTerminal),
        [Token::Terminal(terminal)] if terminal.chars().any(char::is_whitespace) => {
            Err(CompileErrorType::WhitespaceInTerminal(terminal.clone()))
        }
        [Token::Terminal(terminal)] => Ok(RuleKey::Lexical(terminal.into())),
        [] => Err(CompileErrorType::EmptyAlternative),
        _ if tokens.contains(&Token::Equals) => Err(CompileErrorType::UnexpectedEquals),
        _ if tokens.contains(&Token::Or) => Err(CompileErrorType::UnsplitRewrite),
        _ => Err(CompileErrorType::NotChomskyNormalForm(tokens.iter().join(" "))),
    }
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<RuleKey>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<RuleLine> {
    let symbol = match tokens.first() {
        Some(Token::Nonterminal(s)) => Ok(Symbol::from(s)),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let alternatives = parse_rewrite(&tokens[2..])?;

    Ok(RuleLine {
        symbol,
        alternatives,
        location
    })
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<RuleLine> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with(';')
}

// Numbers the lines starting from 1 and drops blank and comment lines. Read
// errors are kept so they get reported with the rest
fn numbered_rule_lines<'a>(
    lines: impl Iterator<Item = std::io::Result<String>> + 'a,
    path: &'a Path
) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    lines
        .map(move |line| line.map_err(|e| io_error(e, path)))
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |line| is_rule_line(line)))
        .map(|(num, line)| (num + 1, line))
}

fn grammar_from_rules(rule_lines: Vec<RuleLine>, path: &Path) -> FileResult<Grammar> {
    let Some(start_symbol) = rule_lines.first().map(|line| line.symbol.clone()) else {
        return Err(vec![CompileError {
            location: Location::file(path),
            error: CompileErrorType::EmptyGrammar
        }]);
    };

    verify_rules(&rule_lines)?;

    let mut store = GrammarStore::new();
    for line in rule_lines {
        for rhs in line.alternatives {
            let rule = Rule { lhs: line.symbol.clone(), rhs };
            if !store.insert(rule) && cfg!(feature = "debug") {
                eprintln!("bnf: {}: duplicate alternative ignored", line.location);
            }
        }
    }

    if cfg!(feature = "debug") {
        eprintln!("bnf: loaded {} rule(s) from {}, start symbol `{}`", store.len(), path.display(), start_symbol);
    }

    Ok(Grammar {
        start_symbol,
        store
    })
}

fn parse_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, path: &Path) -> FileResult<Grammar> {
    let (rules, errors): (Vec<_>, Vec<_>) = lines
        .map(|(num, line_res)| {
            line_res.and_then(|line| parse_lex_line(&line, Location::line(path, num)))
        })
        .partition_result();

    if !errors.is_empty() {
        return Err(errors);
    }

    grammar_from_rules(rules, path)
}

/// Loads the grammar in `path`. Every malformed line is reported, not just
/// the first one.
pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path)])?;
    let lines = std::io::BufReader::new(file).lines();

    parse_lines(numbered_rule_lines(lines, path), path)
}

// Loads a grammar from text, reporting errors as if it came from `path`
pub fn parse_source(source: &str, path: &Path) -> FileResult<Grammar> {
    let lines = source.lines().map(|line| Ok(line.to_string()));

    parse_lines(numbered_rule_lines(lines, path), path)
}
