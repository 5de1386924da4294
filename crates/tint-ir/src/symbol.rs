//! Interned identifiers.

use std::fmt;

use crate::arena::{ArenaId, Handle, UniqueArena};
use crate::error::IrError;

/// An interned identifier issued by a [`SymbolTable`].
///
/// Two symbols are equal only if they come from the same table and name the
/// same string. Symbols are not meaningful outside the table that issued
/// them; use [`CloneContext::clone_symbol`](crate::CloneContext::clone_symbol)
/// to move one into another program.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Handle<String>);

impl Symbol {
    /// Returns the per-table numeric id of this symbol.
    pub fn id(self) -> usize {
        self.0.index()
    }

    /// Returns the id of the table that issued this symbol.
    pub fn table(self) -> ArenaId {
        self.0.arena()
    }

    /// Debug spelling used in type names and AST dumps, e.g. `$3`.
    pub fn to_str(self) -> String {
        format!("${}", self.id())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.id())
    }
}

/// Maps names to [`Symbol`]s. Registration is deduplicating.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: UniqueArena<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, returning the existing symbol if it is already known.
    pub fn register(&mut self, name: &str) -> Symbol {
        if let Some(handle) = self.names.get(name) {
            return Symbol(handle);
        }
        Symbol(self.names.insert(name.to_string()))
    }

    /// Looks up a previously registered name.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.names.get(name).map(Symbol)
    }

    /// Returns the name of `symbol`.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` was issued by a different table.
    pub fn name_for(&self, symbol: Symbol) -> &str {
        &self.names[symbol.0]
    }

    /// Returns the name of `symbol`, or an error if it is foreign to this table.
    pub fn try_name_for(&self, symbol: Symbol) -> Result<&str, IrError> {
        self.names
            .try_get(symbol.0)
            .map(String::as_str)
            .ok_or_else(|| IrError::UnknownSymbol(symbol.to_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over every registered symbol and its name, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.names.iter().map(|(h, name)| (Symbol(h), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_deduplicates() {
        let mut table = SymbolTable::new();
        let a = table.register("main");
        let b = table.register("tint_pointsize");
        let c = table.register("main");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name_for(b), "tint_pointsize");
        assert_eq!(table.get("main"), Some(a));
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn symbols_from_other_tables_are_foreign() {
        let mut a = SymbolTable::new();
        let mut b = SymbolTable::new();
        let sa = a.register("x");
        let sb = b.register("x");
        assert_eq!(sa.id(), sb.id());
        assert_ne!(sa, sb);
        assert!(a.try_name_for(sb).is_err());
        assert_eq!(a.try_name_for(sa).unwrap(), "x");
    }

    #[test]
    fn to_str_uses_id() {
        let mut table = SymbolTable::new();
        table.register("a");
        let b = table.register("b");
        assert_eq!(b.to_str(), "$1");
    }
}
