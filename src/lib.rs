//! Chart parsing for context-free grammars in Chomsky normal form.
//!
//! A [`GrammarStore`] holds binary (`A -> B C`) and lexical (`A -> "word"`)
//! rules indexed by right-hand side. [`ChartParser`] fills the CYK table for
//! a tokenized sentence, keeping every derivation of every span so that all
//! parses of an ambiguous sentence can be read back from the [`Chart`].

pub mod bnf;
pub mod chart;
pub mod error_handling;
pub mod forest;
pub mod generator;
pub mod grammar;

pub use chart::{parse, Chart, ChartParser, ParseError};
pub use forest::{Forest, ForestNode, NodeId, Span, Tree};
pub use grammar::{Grammar, GrammarStore, Rule, RuleKey, Symbol};
