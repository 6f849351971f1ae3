//! Existing-symbol scanning of handler files
//!
//! The scan is textual, not a Go parser. A line starting with `func ` is
//! keyed as `Type)Method` by taking the text between the first `*` and the
//! next `(`. A line starting with `type ` is keyed by deleting `struct {`,
//! every `type` substring and all spaces. Anything else is ignored.
//!
//! Known blind spots, kept on purpose:
//! - a declaration split across lines is not seen
//! - value receivers and parameter lists without a `(` after the first `*`
//!   are mis-keyed or dropped
//! - commented-out declarations are never seen (they start with `//`)
//! - type names containing `type` lose that substring

use std::collections::HashSet;
use std::io::BufRead;

/// Answers whether a symbol is already declared in a handler file
pub trait SymbolOracle {
    fn is_declared(&self, key: &str) -> bool;
}

/// Produces the declared-symbol set of a handler file
///
/// Implementations read from the caller's reader as-is; they neither
/// open, close nor rewind it.
pub trait SymbolScanner {
    fn scan(&self, reader: &mut dyn BufRead) -> ExistingSymbolSet;
}

/// Receiver types and `Type)Method` pairs found in a handler file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExistingSymbolSet {
    symbols: HashSet<String>,
}

impl ExistingSymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.symbols.insert(key.into());
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolOracle for ExistingSymbolSet {
    fn is_declared(&self, key: &str) -> bool {
        self.symbols.contains(key)
    }
}

/// Key under which a method stub is recorded
pub fn method_key(service_type: &str, method_name: &str) -> String {
    format!("{}){}", service_type, method_name)
}

/// Line-prefix scanner
#[derive(Debug, Default, Clone, Copy)]
pub struct LinePrefixScanner;

impl SymbolScanner for LinePrefixScanner {
    fn scan(&self, reader: &mut dyn BufRead) -> ExistingSymbolSet {
        let mut symbols = ExistingSymbolSet::new();

        // A read error ends the scan like end of input
        for line in reader.lines().map_while(|line| line.ok()) {
            if line.starts_with("func ") {
                if let Some(key) = func_key(&line) {
                    symbols.insert(key);
                }
            } else if line.starts_with("type ") {
                symbols.insert(type_key(&line));
            }
        }

        symbols
    }
}

/// `func (s *Order) Get(ctx ...` → `Order)Get`
///
/// Without a `*` the whole line is searched; without a following `(`
/// the line yields no key.
fn func_key(line: &str) -> Option<String> {
    let rest = match line.find('*') {
        Some(star) => &line[star + 1..],
        None => line,
    };
    let paren = rest.find('(')?;
    Some(rest[..paren].replace(' ', ""))
}

/// `type Order struct {` → `Order`
fn type_key(line: &str) -> String {
    line.replace("struct {", "")
        .replace("type", "")
        .replace(' ', "")
}
