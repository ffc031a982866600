/*
    This module builds the CYK chart for a sentence
*/

use std::fmt::Display;

use crate::forest::{Forest, ForestNode, NodeId, Tree};
use crate::grammar::{GrammarStore, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    // No tokens were given
    EmptyInput,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "Cannot parse an empty sentence"),
        }
    }
}

impl std::error::Error for ParseError {}

/// The completed table for one sentence.
///
/// Cell `(start, end)` lists every derivation of `tokens[start..=end]` in
/// the order it was produced. Only cells with `start <= end` exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    tokens: Vec<Symbol>,
    // Upper triangle, row by row
    cells: Vec<Vec<NodeId>>,
    forest: Forest,
}

impl Chart {
    fn new(tokens: Vec<Symbol>) -> Self {
        let n = tokens.len();
        Chart {
            tokens,
            cells: vec![Vec::new(); n * (n + 1) / 2],
            forest: Forest::new(),
        }
    }

    fn cell_index(&self, start: usize, end: usize) -> Option<usize> {
        let n = self.tokens.len();
        if start > end || end >= n {
            return None;
        }
        // Rows before `start` hold n, n - 1, ..., n - start + 1 cells
        Some(start * (2 * n - start + 1) / 2 + (end - start))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Symbol] {
        &self.tokens
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    // None for an id from another chart
    pub fn node(&self, id: NodeId) -> Option<&ForestNode> {
        self.forest.get(id)
    }

    // None outside the upper triangle
    pub fn cell(&self, start: usize, end: usize) -> Option<&[NodeId]> {
        self.cell_index(start, end).map(|index| self.cells[index].as_slice())
    }

    pub fn nodes(&self, start: usize, end: usize) -> impl Iterator<Item = &ForestNode> {
        self.cell(start, end)
            .unwrap_or(&[])
            .iter()
            .map(move |&id| &self.forest[id])
    }

    // Derivations of the whole sentence
    pub fn roots(&self) -> &[NodeId] {
        self.cell(0, self.len().saturating_sub(1)).unwrap_or(&[])
    }

    pub fn is_derivable(&self) -> bool {
        !self.roots().is_empty()
    }

    pub fn derives(&self, symbol: &Symbol) -> bool {
        self.roots().iter().any(|&id| self.forest[id].label() == symbol)
    }

    pub fn tree(&self, id: NodeId) -> Option<Tree> {
        self.forest.tree(id, &self.tokens)
    }

    // Every derivation of the whole sentence, whatever its label
    pub fn trees(&self) -> Vec<Tree> {
        self.roots().iter().filter_map(|&id| self.tree(id)).collect()
    }

    // Derivations of the whole sentence from `start`
    pub fn parses(&self, start: &Symbol) -> Vec<Tree> {
        self.roots()
            .iter()
            .filter(|&&id| self.forest[id].label() == start)
            .filter_map(|&id| self.tree(id))
            .collect()
    }

    /// Positions whose token matched no lexical rule. Nothing spanning them
    /// can be derived.
    pub fn unknown_terminals(&self) -> Vec<(usize, &Symbol)> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|&(position, _)| self.cell(position, position).is_some_and(<[NodeId]>::is_empty))
            .collect()
    }

    // Every cell as (start, end, derivations), shortest spans first
    pub fn spans(&self) -> impl Iterator<Item = (usize, usize, &[NodeId])> {
        let n = self.len();
        (1..=n)
            .flat_map(move |length| (0..=n - length).map(move |start| (start, start + length - 1)))
            .filter_map(move |(start, end)| self.cell(start, end).map(|cell| (start, end, cell)))
    }
}

/// Fills charts bottom-up with the CYK recurrence, reading rules from a
/// grammar store it never modifies.
pub struct ChartParser<'g> {
    grammar: &'g GrammarStore,
}

impl<'g> ChartParser<'g> {
    pub fn new(grammar: &'g GrammarStore) -> Self {
        ChartParser { grammar }
    }

    pub fn parse<T: AsRef<str>>(&self, tokens: &[T]) -> Result<Chart, ParseError> {
        if tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut chart = Chart::new(tokens.iter().map(|token| Symbol::new(token.as_ref())).collect());
        let n = chart.len();

        self.fill_diagonal(&mut chart);
        for length in 2..=n {
            for start in 0..=(n - length) {
                self.fill_cell(&mut chart, start, start + length - 1);
            }
        }

        if cfg!(feature = "debug") {
            eprintln!(
                "chart: {} token(s), {} node(s), {} full derivation(s)",
                n,
                chart.forest.len(),
                chart.roots().len()
            );
        }
        Ok(chart)
    }

    fn fill_diagonal(&self, chart: &mut Chart) {
        for position in 0..chart.len() {
            let token = chart.tokens[position].clone();
            let labels = self.grammar.lookup_by_rhs(std::slice::from_ref(&token));

            if cfg!(feature = "debug") && labels.is_empty() {
                eprintln!("chart: `{}` at {} is not in the lexicon", token, position);
            }

            let leaves: Vec<NodeId> = labels
                .iter()
                .map(|label| chart.forest.leaf(label.clone(), position))
                .collect();
            if let Some(index) = chart.cell_index(position, position) {
                chart.cells[index] = leaves;
            }
        }
    }

    // Combines every split of the span; splits are visited left to right
    fn fill_cell(&self, chart: &mut Chart, start: usize, end: usize) {
        let mut derived = Vec::new();

        for split in start..end {
            let (Some(left), Some(right)) = (chart.cell_index(start, split), chart.cell_index(split + 1, end)) else {
                continue;
            };
            let (left, right) = (&chart.cells[left], &chart.cells[right]);
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let composed = self.grammar.compose_from_forest_pairs(&mut chart.forest, left, right);
            if cfg!(feature = "debug") && !composed.is_empty() {
                eprintln!("chart: ({}, {}) split at {}: {} derivation(s)", start, end, split, composed.len());
            }
            derived.extend(composed);
        }

        if let Some(index) = chart.cell_index(start, end) {
            chart.cells[index] = derived;
        }
    }
}

// Parses `tokens` against `grammar` in one call
pub fn parse<T: AsRef<str>>(tokens: &[T], grammar: &GrammarStore) -> Result<Chart, ParseError> {
    ChartParser::new(grammar).parse(tokens)
}
