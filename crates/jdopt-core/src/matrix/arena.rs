use jdopt_expr::{ExprId, LinExpr, NamedConstRegistry};

use crate::model::ModelError;

/// Per-model store of scalar expressions referenced by [`ExprMatrix`] cells.
///
/// [`ExprMatrix`]: crate::matrix::ExprMatrix
#[derive(Debug, Clone, Default)]
pub struct ExprArena {
    exprs: Vec<LinExpr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, expr: LinExpr) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn get(&self, id: ExprId) -> Result<&LinExpr, ModelError> {
        self.exprs.get(id.index()).ok_or(ModelError::InvalidExprId(id))
    }

    pub fn get_mut(&mut self, id: ExprId) -> Result<&mut LinExpr, ModelError> {
        self.exprs
            .get_mut(id.index())
            .ok_or(ModelError::InvalidExprId(id))
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Rewire every stored expression onto the registry's canonical leaves.
    pub(crate) fn deduplicate(&mut self, registry: &NamedConstRegistry) -> usize {
        self.exprs
            .iter_mut()
            .map(|expr| expr.deduplicate(registry))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdopt_expr::VariableId;

    #[test]
    fn alloc_hands_out_sequential_handles() {
        let mut arena = ExprArena::new();
        let first = arena.alloc(LinExpr::var(VariableId::new(0)));
        let second = arena.alloc(LinExpr::new());
        assert_eq!(first.inner(), 0);
        assert_eq!(second.inner(), 1);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn unknown_handle_is_an_error() {
        let arena = ExprArena::new();
        let err = arena.get(ExprId::new(4)).unwrap_err();
        assert_eq!(err, ModelError::InvalidExprId(ExprId::new(4)));
    }
}
