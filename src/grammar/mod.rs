/*
    This module is for storing grammar rules and looking them up by their
    right-hand side
*/

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use itertools::Itertools;

use crate::forest::{Forest, NodeId};

// A nonterminal or terminal name. Compared by exact value, no normalization
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(Arc::from(name))
    }
}

impl From<&String> for Symbol {
    fn from(name: &String) -> Self {
        Symbol::new(name)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The right-hand side of a CNF rule, used as the lookup key. Order matters:
// `Binary(a, b)` and `Binary(b, a)` are different keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Lexical(Symbol),
    Binary(Symbol, Symbol),
}

impl RuleKey {
    // Builds a key from a one or two symbol right-hand side
    pub fn from_symbols(rhs: &[Symbol]) -> Option<RuleKey> {
        match rhs {
            [terminal] => Some(RuleKey::Lexical(terminal.clone())),
            [left, right] => Some(RuleKey::Binary(left.clone(), right.clone())),
            _ => None,
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, RuleKey::Lexical(_))
    }
}

impl Display for RuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKey::Lexical(terminal) => write!(f, "\"{}\"", terminal),
            RuleKey::Binary(left, right) => write!(f, "{} {}", left, right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: Symbol,
    pub rhs: RuleKey,
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs)
    }
}

/// Binary and lexical rules of a grammar in Chomsky normal form, indexed by
/// right-hand side.
///
/// Every right-hand side maps to its left-hand sides in registration order,
/// and a given `lhs -> rhs` pair is only ever stored once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrammarStore {
    productions: HashMap<RuleKey, Vec<Symbol>>,
    // Every rule in registration order, and where each lhs' rules live in it
    rules: Vec<Rule>,
    by_lhs: HashMap<Symbol, Vec<usize>>,
}

impl GrammarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `lhs -> left right`. Returns false if the rule was already
    /// present, in which case nothing changes.
    pub fn add_rule<S: Into<Symbol>>(&mut self, lhs: impl Into<Symbol>, rhs: [S; 2]) -> bool {
        let [left, right] = rhs;
        self.insert(Rule {
            lhs: lhs.into(),
            rhs: RuleKey::Binary(left.into(), right.into()),
        })
    }

    /// Registers `lhs -> terminal` for every terminal. Returns how many of
    /// them were new.
    pub fn add_lexical_rule<S: Into<Symbol>>(
        &mut self,
        lhs: impl Into<Symbol>,
        terminals: impl IntoIterator<Item = S>,
    ) -> usize {
        let lhs = lhs.into();
        let mut inserted = 0;
        for terminal in terminals {
            let rule = Rule {
                lhs: lhs.clone(),
                rhs: RuleKey::Lexical(terminal.into()),
            };
            if self.insert(rule) {
                inserted += 1;
            }
        }
        inserted
    }

    pub fn insert(&mut self, rule: Rule) -> bool {
        let lhss = self.productions.entry(rule.rhs.clone()).or_default();
        if lhss.contains(&rule.lhs) {
            return false;
        }
        lhss.push(rule.lhs.clone());

        self.by_lhs
            .entry(rule.lhs.clone())
            .or_default()
            .push(self.rules.len());
        self.rules.push(rule);
        true
    }

    // Left-hand sides that derive the key, in registration order
    pub fn lookup(&self, rhs: &RuleKey) -> &[Symbol] {
        self.productions.get(rhs).map_or(&[], Vec::as_slice)
    }

    /// Left-hand sides registered for a one symbol (lexical) or two symbol
    /// (binary) right-hand side. Empty when nothing derives it.
    pub fn lookup_by_rhs(&self, rhs: &[Symbol]) -> &[Symbol] {
        match RuleKey::from_symbols(rhs) {
            Some(key) => self.lookup(&key),
            None => &[],
        }
    }

    /// Combines every pair from `left × right` through the binary rules,
    /// appending a new node to `forest` for each left-hand side found.
    ///
    /// The result is ordered by left alternative, then right alternative,
    /// then rule registration order. It is empty when no pair composes.
    pub fn compose_from_forest_pairs(
        &self,
        forest: &mut Forest,
        left: &[NodeId],
        right: &[NodeId],
    ) -> Vec<NodeId> {
        let mut composed = Vec::new();
        for &l in left {
            for &r in right {
                let key = RuleKey::Binary(forest[l].label().clone(), forest[r].label().clone());
                for lhs in self.lookup(&key) {
                    composed.push(forest.branch(lhs.clone(), l, r));
                }
            }
        }
        composed
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn rules_for<'a>(&'a self, lhs: &Symbol) -> impl Iterator<Item = &'a Rule> + 'a {
        self.by_lhs
            .get(lhs)
            .into_iter()
            .flatten()
            .map(move |&index| &self.rules[index])
    }

    pub fn defines(&self, lhs: &Symbol) -> bool {
        self.by_lhs.contains_key(lhs)
    }

    // Left-hand sides in the order they were first registered
    pub fn nonterminals(&self) -> impl Iterator<Item = &Symbol> {
        self.rules.iter().map(|rule| &rule.lhs).unique()
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.rules
            .iter()
            .filter_map(|rule| match &rule.rhs {
                RuleKey::Lexical(terminal) => Some(terminal),
                RuleKey::Binary(..) => None,
            })
            .unique()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// Prints the rules grouped by left-hand side, in the same format the grammar
// files use, so the output can be loaded again
impl Display for GrammarStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for lhs in self.nonterminals() {
            let alternatives = self.rules_for(lhs).map(|rule| &rule.rhs).join(" | ");
            writeln!(f, "{} = {}", lhs, alternatives)?;
        }
        Ok(())
    }
}

// A store together with the symbol full sentences should derive from
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    pub start_symbol: Symbol,
    pub store: GrammarStore,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|&name| Symbol::from(name)).collect()
    }

    #[test]
    fn add_binary_rule() {
        let mut store = GrammarStore::new();
        assert!(store.add_rule("S", ["NP", "VP"]));

        assert_eq!(store.lookup_by_rhs(&symbols(&["NP", "VP"])), symbols(&["S"]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_lexical_rule() {
        let mut store = GrammarStore::new();
        assert_eq!(store.add_lexical_rule("Pronoun", ["I", "she", "me"]), 3);

        for word in ["I", "she", "me"] {
            assert_eq!(store.lookup_by_rhs(&symbols(&[word])), symbols(&["Pronoun"]));
        }
    }

    #[test]
    fn lookup_missing_is_empty() {
        let mut store = GrammarStore::new();
        store.add_rule("S", ["NP", "VP"]);

        assert!(store.lookup_by_rhs(&symbols(&["VP", "NP"])).is_empty());
        assert!(store.lookup_by_rhs(&symbols(&["NP"])).is_empty());
        assert!(store.lookup_by_rhs(&[]).is_empty());
        assert!(store.lookup_by_rhs(&symbols(&["NP", "VP", "PP"])).is_empty());
    }

    #[test]
    fn ambiguous_rhs_keeps_registration_order() {
        let mut store = GrammarStore::new();
        store.add_rule("S", ["Verb", "NP"]);
        store.add_rule("VP", ["Verb", "NP"]);
        store.add_rule("X2", ["Verb", "NP"]);
        store.add_lexical_rule("Verb", ["book"]);
        store.add_lexical_rule("Nominal", ["book"]);

        assert_eq!(store.lookup_by_rhs(&symbols(&["Verb", "NP"])), symbols(&["S", "VP", "X2"]));
        assert_eq!(store.lookup_by_rhs(&symbols(&["book"])), symbols(&["Verb", "Nominal"]));
    }

    #[test]
    fn duplicate_rules_are_ignored() {
        let mut store = GrammarStore::new();
        assert!(store.add_rule("S", ["NP", "VP"]));
        assert!(!store.add_rule("S", ["NP", "VP"]));
        assert_eq!(store.add_lexical_rule("Det", ["the", "a"]), 2);
        assert_eq!(store.add_lexical_rule("Det", ["the", "this"]), 1);

        assert_eq!(store.lookup_by_rhs(&symbols(&["NP", "VP"])), symbols(&["S"]));
        assert_eq!(store.lookup_by_rhs(&symbols(&["the"])), symbols(&["Det"]));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn symbols_containing_separators_do_not_collide() {
        let mut store = GrammarStore::new();
        store.add_rule("S", ["A, B", "C"]);

        assert!(store.lookup_by_rhs(&symbols(&["A", "B, C"])).is_empty());
        assert!(store.lookup_by_rhs(&symbols(&["A, B, C"])).is_empty());
        assert_eq!(store.lookup_by_rhs(&symbols(&["A, B", "C"])), symbols(&["S"]));
    }

    #[test]
    fn compose_single_pair() {
        let mut store = GrammarStore::new();
        store.add_rule("S", ["NP", "VP"]);

        let mut forest = Forest::new();
        let np = forest.leaf("NP".into(), 0);
        let vp = forest.leaf("VP".into(), 1);
        let composed = store.compose_from_forest_pairs(&mut forest, &[np], &[vp]);

        assert_eq!(composed.len(), 1);
        let node = &forest[composed[0]];
        assert_eq!(node.label().as_str(), "S");
        assert_eq!(node.children(), Some((np, vp)));
        assert_eq!(node.span(), (0, 1));
    }

    #[test]
    fn compose_orders_left_then_right_then_rule() {
        let mut store = GrammarStore::new();
        store.add_rule("S", ["NP", "VP"]);
        store.add_rule("S", ["Verb", "NP"]);
        store.add_rule("VP", ["Verb", "NP"]);

        let mut forest = Forest::new();
        let left = vec![forest.leaf("NP".into(), 0), forest.leaf("Verb".into(), 0)];
        let right = vec![forest.leaf("VP".into(), 1), forest.leaf("NP".into(), 1)];
        let composed = store.compose_from_forest_pairs(&mut forest, &left, &right);

        let described = composed
            .iter()
            .map(|&id| {
                let (l, r) = forest[id].children().unwrap();
                format!("{} {} {}", forest[id].label(), forest[l].label(), forest[r].label())
            })
            .collect_vec();
        assert_eq!(described, vec!["S NP VP", "S Verb NP", "VP Verb NP"]);
    }

    #[test]
    fn compose_nothing_is_empty() {
        let mut store = GrammarStore::new();
        store.add_rule("S", ["NP", "VP"]);

        let mut forest = Forest::new();
        let vp = forest.leaf("VP".into(), 0);
        let np = forest.leaf("NP".into(), 1);

        assert!(store.compose_from_forest_pairs(&mut forest, &[vp], &[np]).is_empty());
        assert!(store.compose_from_forest_pairs(&mut forest, &[], &[np]).is_empty());
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn rules_grouped_by_lhs() {
        let mut store = GrammarStore::new();
        store.add_rule("S", ["NP", "VP"]);
        store.add_lexical_rule("Det", ["the"]);
        store.add_rule("S", ["Verb", "NP"]);

        let s_rules = store.rules_for(&"S".into()).map(|rule| rule.to_string()).collect_vec();
        assert_eq!(s_rules, vec!["S -> NP VP", "S -> Verb NP"]);
        assert_eq!(store.rules_for(&"VP".into()).count(), 0);
        assert!(store.defines(&"Det".into()));
        assert_eq!(store.nonterminals().collect_vec(), symbols(&["S", "Det"]).iter().collect_vec());
        assert_eq!(store.terminals().collect_vec(), symbols(&["the"]).iter().collect_vec());
    }

    #[test]
    fn display_as_grammar_file() {
        let mut store = GrammarStore::new();
        store.add_rule("S", ["NP", "VP"]);
        store.add_lexical_rule("Det", ["the", "a"]);
        store.add_rule("S", ["Verb", "NP"]);

        assert_eq!(store.to_string(), "S = NP VP | Verb NP\nDet = \"the\" | \"a\"\n");
    }
}
