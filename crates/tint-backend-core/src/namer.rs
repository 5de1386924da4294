//! Output-language identifiers for program symbols.

use std::collections::{HashMap, HashSet};

use tint_ir::{Symbol, SymbolTable};

use crate::keywords;

/// Maps program symbols to identifiers of the output language.
///
/// Asking twice for the same symbol returns the same name.
pub trait Namer {
    fn name_for(&mut self, symbol: Symbol) -> String;
}

/// Which namer a backend should use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NamerKind {
    /// Source names, unchanged.
    #[default]
    Unsafe,
    /// Avoid HLSL reserved words.
    Hlsl,
    /// Avoid Metal Shading Language reserved words.
    Msl,
}

impl NamerKind {
    pub fn build<'a>(self, symbols: &'a SymbolTable) -> Box<dyn Namer + 'a> {
        match self {
            Self::Unsafe => Box::new(UnsafeNamer::new(symbols)),
            Self::Hlsl => Box::new(ReservedWordNamer::new(symbols, keywords::HLSL_RESERVED)),
            Self::Msl => Box::new(ReservedWordNamer::new(symbols, keywords::MSL_RESERVED)),
        }
    }
}

/// Returns symbol names as written in the source.
#[derive(Debug)]
pub struct UnsafeNamer<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> UnsafeNamer<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }
}

impl Namer for UnsafeNamer<'_> {
    fn name_for(&mut self, symbol: Symbol) -> String {
        self.symbols.name_for(symbol).to_string()
    }
}

/// Renames symbols that clash with a sorted list of reserved words.
///
/// A reserved `name` becomes `name_tint_N` for the first free `N`. Any other
/// name is kept unless an earlier renaming already produced it, in which
/// case it becomes `name_N`.
#[derive(Debug)]
pub struct ReservedWordNamer<'a> {
    symbols: &'a SymbolTable,
    reserved: &'static [&'static str],
    names: HashMap<Symbol, String>,
    /// Every name handed out so far.
    issued: HashSet<String>,
}

impl<'a> ReservedWordNamer<'a> {
    pub fn new(symbols: &'a SymbolTable, reserved: &'static [&'static str]) -> Self {
        debug_assert!(reserved.windows(2).all(|w| w[0] < w[1]), "reserved words must be sorted");
        Self {
            symbols,
            reserved,
            names: HashMap::new(),
            issued: HashSet::new(),
        }
    }

    fn is_taken(&self, candidate: &str) -> bool {
        self.issued.contains(candidate)
            || self
                .symbols
                .get(candidate)
                .is_some_and(|s| self.names.contains_key(&s))
    }
}

impl Namer for ReservedWordNamer<'_> {
    fn name_for(&mut self, symbol: Symbol) -> String {
        if let Some(name) = self.names.get(&symbol) {
            return name.clone();
        }
        let symbols = self.symbols;
        let name = symbols.name_for(symbol);
        let renamed = if keywords::is_reserved(self.reserved, name) {
            (0..)
                .map(|i| format!("{name}_tint_{i}"))
                .find(|candidate| !self.is_taken(candidate))
        } else if self.is_taken(name) {
            (0..)
                .map(|i| format!("{name}_{i}"))
                .find(|candidate| !self.is_taken(candidate))
        } else {
            Some(name.to_string())
        };
        let renamed = renamed.unwrap_or_else(|| name.to_string());
        if renamed != name {
            log::debug!("renamed '{name}' to '{renamed}'");
        }
        self.issued.insert(renamed.clone());
        self.names.insert(symbol, renamed.clone());
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsafe_namer_keeps_names() {
        let mut symbols = SymbolTable::new();
        let s = symbols.register("float4");
        let mut namer = UnsafeNamer::new(&symbols);
        assert_eq!(namer.name_for(s), "float4");
    }

    #[test]
    fn reserved_names_are_suffixed() {
        let mut symbols = SymbolTable::new();
        let float4 = symbols.register("float4");
        let plain = symbols.register("color");
        let mut namer = ReservedWordNamer::new(&symbols, keywords::HLSL_RESERVED);
        assert_eq!(namer.name_for(float4), "float4_tint_0");
        assert_eq!(namer.name_for(plain), "color");
    }

    #[test]
    fn remapped_names_are_not_reused() {
        let mut symbols = SymbolTable::new();
        let float4 = symbols.register("float4");
        let clash = symbols.register("float4_tint_0");
        let mut namer = ReservedWordNamer::new(&symbols, keywords::HLSL_RESERVED);
        assert_eq!(namer.name_for(float4), "float4_tint_0");
        assert_eq!(namer.name_for(clash), "float4_tint_0_0");
    }

    #[test]
    fn renaming_skips_existing_source_names() {
        let mut symbols = SymbolTable::new();
        let clash = symbols.register("float4_tint_0");
        let float4 = symbols.register("float4");
        let mut namer = ReservedWordNamer::new(&symbols, keywords::HLSL_RESERVED);
        assert_eq!(namer.name_for(clash), "float4_tint_0");
        assert_eq!(namer.name_for(float4), "float4_tint_1");
    }

    #[test]
    fn names_are_memoized() {
        let mut symbols = SymbolTable::new();
        let s = symbols.register("kernel");
        let mut namer = ReservedWordNamer::new(&symbols, keywords::MSL_RESERVED);
        let first = namer.name_for(s);
        assert_eq!(first, "kernel_tint_0");
        assert_eq!(namer.name_for(s), first);
    }
}
