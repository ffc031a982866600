//! Properties every chart must satisfy, checked on random sentences over the
//! airline grammar's vocabulary (plus a word it does not know).

use std::path::Path;

use cky::{bnf, parse, Chart, Grammar, GrammarStore, Tree};
use proptest::prelude::*;

const VOCABULARY: &[&str] = &[
    "book", "the", "flight", "through", "Houston", "does", "she", "prefer", "a", "meal", "to",
    "TWA", "me", "zebra",
];

fn airline() -> Grammar {
    bnf::parse_file(Path::new("example_data/airline.bnf")).unwrap()
}

fn sentence_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 1..7)
}

fn cell_trees(chart: &Chart, start: usize, end: usize) -> Vec<Tree> {
    chart.cell(start, end).unwrap().iter().map(|&id| chart.tree(id).unwrap()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parsing_is_deterministic(sentence in sentence_strategy()) {
        let grammar = airline();
        let first = parse(&sentence, &grammar.store).unwrap();
        let second = parse(&sentence, &grammar.store).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn nodes_cover_exactly_their_span(sentence in sentence_strategy()) {
        let grammar = airline();
        let chart = parse(&sentence, &grammar.store).unwrap();

        for (start, end, cell) in chart.spans() {
            for &id in cell {
                prop_assert_eq!(chart.node(id).unwrap().span(), (start, end));

                let tree = chart.tree(id).unwrap();
                let leaves: Vec<&str> = tree.leaves().into_iter().map(|leaf| leaf.as_str()).collect();
                prop_assert_eq!(&leaves[..], &sentence[start..=end]);
            }
        }
    }

    #[test]
    fn unknown_words_block_every_span_over_them(sentence in sentence_strategy()) {
        let grammar = airline();
        let chart = parse(&sentence, &grammar.store).unwrap();
        let unknown: Vec<usize> = chart.unknown_terminals().into_iter().map(|(position, _)| position).collect();

        let expected: Vec<usize> = sentence.iter().enumerate()
            .filter(|(_, &word)| word == "zebra")
            .map(|(position, _)| position)
            .collect();
        prop_assert_eq!(&unknown, &expected);

        for (start, end, cell) in chart.spans() {
            if unknown.iter().any(|&position| start <= position && position <= end) {
                prop_assert!(cell.is_empty());
            }
        }
    }

    #[test]
    fn extending_the_grammar_only_adds(sentence in sentence_strategy()) {
        let grammar = airline();
        let mut extended: GrammarStore = grammar.store.clone();
        extended.add_lexical_rule("Noun", ["zebra"]);
        extended.add_lexical_rule("Nominal", ["zebra"]);
        extended.add_rule("S", ["NP", "NP"]);
        extended.add_rule("NP", ["Det", "Noun"]);

        let before = parse(&sentence, &grammar.store).unwrap();
        let after = parse(&sentence, &extended).unwrap();

        for (start, end, _) in before.spans() {
            let old = cell_trees(&before, start, end);
            let new = cell_trees(&after, start, end);
            prop_assert!(new.len() >= old.len());
            for tree in &old {
                let count = |trees: &[Tree]| trees.iter().filter(|&t| t == tree).count();
                prop_assert!(count(&new) >= count(&old), "{} lost from ({}, {})", tree, start, end);
            }
        }
    }

    #[test]
    fn re_adding_rules_changes_nothing(sentence in sentence_strategy()) {
        let grammar = airline();
        let mut doubled = grammar.store.clone();
        for rule in grammar.store.rules() {
            prop_assert!(!doubled.insert(rule.clone()));
        }

        let once = parse(&sentence, &grammar.store).unwrap();
        let twice = parse(&sentence, &doubled).unwrap();
        prop_assert_eq!(once, twice);
    }
}
