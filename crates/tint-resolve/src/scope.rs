//! Lexical scopes for identifier lookup.

use std::collections::HashMap;

use tint_ir::Symbol;

/// A stack of nested scopes mapping symbols to declarations.
///
/// The outermost scope is the module scope and is never popped.
#[derive(Debug)]
pub(crate) struct ScopeStack<T> {
    scopes: Vec<HashMap<Symbol, T>>,
}

impl<T: Copy> ScopeStack<T> {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        debug_assert!(self.scopes.len() > 1, "popped the module scope");
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares `symbol` in the innermost scope.
    pub fn declare(&mut self, symbol: Symbol, value: T) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol, value);
        }
    }

    /// Looks `symbol` up from the innermost scope outwards.
    pub fn get(&self, symbol: Symbol) -> Option<T> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&symbol).copied())
    }

    /// `true` if the innermost declaration of `symbol` is at module scope.
    pub fn is_module_scope(&self, symbol: Symbol) -> bool {
        self.scopes
            .iter()
            .rposition(|scope| scope.contains_key(&symbol))
            == Some(0)
    }
}
