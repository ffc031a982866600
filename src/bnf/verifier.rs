use std::collections::HashSet;

use crate::grammar::{RuleKey, Symbol};
use super::CompileErrorType::UndefinedNonterminal;
use super::{CompileError, CompileErrors, FileResult, RuleLine};

fn get_alternative_undefined_symbols(alternative: &RuleKey, line: &RuleLine, defined: &HashSet<&Symbol>) -> CompileErrors {
    // Only binary alternatives refer to nonterminals. Keep the ones that no
    // line defines
    match alternative {
        RuleKey::Lexical(_) => Vec::new(),
        RuleKey::Binary(left, right) => [left, right].into_iter()
            .filter(|symbol| !defined.contains(symbol))
            .map(|symbol| CompileError {
                location: line.location.to_owned(),
                error: UndefinedNonterminal(symbol.to_string())
            })
            .collect()
    }
}

fn get_line_undefined_symbols(line: &RuleLine, defined: &HashSet<&Symbol>) -> CompileErrors {
    line.alternatives.iter()
        .flat_map(|alternative| get_alternative_undefined_symbols(alternative, line, defined))
        .collect()
}

fn get_undefined_symbols(rules: &[RuleLine]) -> CompileErrors {
    // A nonterminal may be defined over several lines, so gather every
    // definition before checking any references
    let defined: HashSet<&Symbol> = rules.iter().map(|line| &line.symbol).collect();

    rules.iter()
        .flat_map(|line| get_line_undefined_symbols(line, &defined))
        .collect()
}

pub fn verify_rules(rules: &[RuleLine]) -> FileResult<()> {
    let errors = get_undefined_symbols(rules);

    if !errors.is_empty() {
        Err(errors)
    } else {
        Ok(())
    }
}
