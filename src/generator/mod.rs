/*
    This module generates sentences a grammar derives
*/

use std::fmt::Display;

use itertools::Itertools;
use rand::prelude::*;

use crate::grammar::*;

#[derive(Debug, PartialEq)]
pub enum GenerateError {
    // An undefined nonterminal was used
    UndefinedNonterminal(String),
    // The derivation grew deeper than allowed
    DepthExceeded(usize),
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::UndefinedNonterminal(nonterminal) => write!(f, "No definition for nonterminal `{}`", nonterminal),
            GenerateError::DepthExceeded(depth) => write!(f, "Derivation did not finish within depth {}", depth),
        }
    }
}

impl std::error::Error for GenerateError {}

pub type GenResult = Result<Vec<Symbol>, GenerateError>;

// Generates a sentence starting from the grammar's start symbol
pub fn generate<R: Rng + ?Sized>(grammar: &Grammar, rng: &mut R, max_depth: usize) -> GenResult {
    generate_from(&grammar.store, &grammar.start_symbol, rng, max_depth)
}

/// Generates a sentence derivable from `start`, picking uniformly among the
/// alternatives of every nonterminal.
///
/// Past half of `max_depth`, nonterminals with lexical alternatives only
/// pick among those, so recursive grammars still tend to finish.
pub fn generate_from<R: Rng + ?Sized>(store: &GrammarStore, start: &Symbol, rng: &mut R, max_depth: usize) -> GenResult {
    let mut sentence = Vec::new();
    generate_nonterminal(store, start, rng, 0, max_depth, &mut sentence)?;
    Ok(sentence)
}

fn generate_nonterminal<R: Rng + ?Sized>(
    store: &GrammarStore,
    nonterminal: &Symbol,
    rng: &mut R,
    depth: usize,
    max_depth: usize,
    sentence: &mut Vec<Symbol>,
) -> Result<(), GenerateError> {
    if depth >= max_depth {
        return Err(GenerateError::DepthExceeded(max_depth));
    }

    let alternatives = store.rules_for(nonterminal).collect_vec();
    let lexical = alternatives.iter().copied().filter(|rule| rule.rhs.is_lexical()).collect_vec();
    let pool = if depth >= max_depth / 2 && !lexical.is_empty() {
        &lexical
    } else {
        &alternatives
    };

    let rule = pool
        .choose(rng)
        .ok_or_else(|| GenerateError::UndefinedNonterminal(nonterminal.to_string()))?;

    match &rule.rhs {
        RuleKey::Lexical(terminal) => sentence.push(terminal.clone()),
        RuleKey::Binary(left, right) => {
            generate_nonterminal(store, left, rng, depth + 1, max_depth, sentence)?;
            generate_nonterminal(store, right, rng, depth + 1, max_depth, sentence)?;
        }
    }
    Ok(())
}
