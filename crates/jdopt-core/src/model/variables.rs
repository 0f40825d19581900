//! Variable creation and edits.

use jdopt_expr::VariableId;

use crate::matrix::VarMatrix;
use crate::model::Model;
use crate::model::error::ModelError;
use crate::types::{Bounds, Variable, VariableSpec, VariableType};

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, spec: VariableSpec) -> Result<VariableId, ModelError> {
        let bounds = spec.effective_bounds();
        if !bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }

        let id = VariableId::new(self.next_variable_id);
        self.next_variable_id += 1;

        let var_type = spec.var_type;
        self.variables.insert(id, Variable::new(id, spec));
        self.pool_mut(var_type).push(id);

        tracing::trace!(
            component = "model",
            operation = "add_variable",
            status = "success",
            var_id = id.inner(),
            var_type = var_type.as_str(),
            "Added variable"
        );
        Ok(id)
    }

    /// Add a `rows x cols` block of variables sharing one spec.
    ///
    /// A named spec names each cell `name[row,col]`, or `name[col]` for a
    /// single row.
    pub fn add_variables(
        &mut self,
        rows: usize,
        cols: usize,
        spec: VariableSpec,
    ) -> Result<VarMatrix, ModelError> {
        if rows == 0 || cols == 0 {
            return Err(ModelError::InvalidDimensions {
                rows,
                cols,
                cells: 0,
            });
        }
        let bounds = spec.effective_bounds();
        if !bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }

        let mut ids = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let name = spec.name.as_ref().map(|base| {
                    if rows == 1 {
                        format!("{base}[{col}]")
                    } else {
                        format!("{base}[{row},{col}]")
                    }
                });
                let cell_spec = VariableSpec {
                    name,
                    ..spec.clone()
                };
                ids.push(self.add_variable(cell_spec)?);
            }
        }
        tracing::debug!(
            component = "model",
            operation = "add_variables",
            status = "success",
            rows,
            cols,
            var_type = spec.var_type.as_str(),
            "Added variable block"
        );
        VarMatrix::new(rows, cols, ids)
    }

    /// Add a `1 x len` row of variables.
    pub fn add_vector(&mut self, len: usize, spec: VariableSpec) -> Result<VarMatrix, ModelError> {
        self.add_variables(1, len, spec)
    }

    /// Get a variable by ID.
    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(&id)
            .ok_or(ModelError::InvalidVariableId(id))
    }

    /// First variable carrying `name`, in id order.
    pub fn get_variable_by_name(&self, name: &str) -> Option<&Variable> {
        self.variables
            .values()
            .find(|var| var.name() == Some(name))
    }

    /// Change a variable's type and move it to the matching pool.
    ///
    /// A free variable turned binary gets `[0, 1]` bounds; explicit bounds are kept.
    pub fn set_variable_type(
        &mut self,
        id: VariableId,
        var_type: VariableType,
    ) -> Result<(), ModelError> {
        let var = self
            .variables
            .get_mut(&id)
            .ok_or(ModelError::InvalidVariableId(id))?;
        let previous = var.var_type;
        if previous == var_type {
            return Ok(());
        }
        var.var_type = var_type;
        if var_type == VariableType::Binary && var.bounds == Bounds::free() {
            var.bounds = Bounds::binary();
        }
        self.pool_mut(previous).retain(|pooled| *pooled != id);
        self.pool_mut(var_type).push(id);
        tracing::debug!(
            component = "model",
            operation = "set_variable_type",
            status = "success",
            var_id = id.inner(),
            from = previous.as_str(),
            to = var_type.as_str(),
            "Changed variable type"
        );
        Ok(())
    }

    pub fn set_bounds(&mut self, id: VariableId, lower: f64, upper: f64) -> Result<(), ModelError> {
        let bounds = Bounds::new(lower, upper);
        if !bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds { lower, upper });
        }
        let var = self
            .variables
            .get_mut(&id)
            .ok_or(ModelError::InvalidVariableId(id))?;
        var.bounds = bounds;
        Ok(())
    }

    pub fn set_branch_priority(&mut self, id: VariableId, priority: u8) -> Result<(), ModelError> {
        let var = self
            .variables
            .get_mut(&id)
            .ok_or(ModelError::InvalidVariableId(id))?;
        var.branch_priority = priority;
        Ok(())
    }

    /// Solved value of a variable, `None` until a backend assigned one.
    pub fn solved_value(&self, id: VariableId) -> Result<Option<f64>, ModelError> {
        Ok(self.get_variable(id)?.solved_value())
    }

    /// All variables in id order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Continuous variables in creation order.
    pub fn continuous_variables(&self) -> &[VariableId] {
        &self.continuous
    }

    pub fn binary_variables(&self) -> &[VariableId] {
        &self.binary
    }

    pub fn integer_variables(&self) -> &[VariableId] {
        &self.integer
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_creation_order() {
        let mut model = Model::new();
        let a = model.add_variable(VariableSpec::continuous()).unwrap();
        let block = model
            .add_variables(2, 2, VariableSpec::integer().with_bounds(0.0, 5.0))
            .unwrap();
        let b = model.add_variable(VariableSpec::binary()).unwrap();

        let ids: Vec<u32> = model.variables().map(|var| var.id().inner()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(a.inner(), 0);
        assert_eq!(block.ids()[3].inner(), 4);
        assert_eq!(b.inner(), 5);
        assert_eq!(model.integer_variables().len(), 4);
        assert_eq!(model.binary_variables(), &[b]);
    }

    #[test]
    fn block_names_cells() {
        let mut model = Model::new();
        let x = model
            .add_vector(3, VariableSpec::continuous().with_name("x"))
            .unwrap();
        let grid = model
            .add_variables(2, 2, VariableSpec::continuous().with_name("g"))
            .unwrap();
        assert_eq!(model.get_variable(x.ids()[2]).unwrap().name(), Some("x[2]"));
        assert_eq!(
            model.get_variable_by_name("g[1,0]").map(Variable::id),
            Some(grid.ids()[2])
        );
        assert!(model.get_variable_by_name("missing").is_none());
    }

    #[test]
    fn set_variable_type_moves_between_pools() {
        let mut model = Model::new();
        let x = model.add_variable(VariableSpec::continuous()).unwrap();
        model.set_variable_type(x, VariableType::Binary).unwrap();
        assert!(model.continuous_variables().is_empty());
        assert_eq!(model.binary_variables(), &[x]);
        assert_eq!(model.get_variable(x).unwrap().bounds(), Bounds::binary());

        model.set_variable_type(x, VariableType::Integer).unwrap();
        assert!(model.binary_variables().is_empty());
        assert_eq!(model.integer_variables(), &[x]);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let mut model = Model::new();
        let result = model.add_variable(VariableSpec::continuous().with_bounds(5.0, 1.0));
        assert!(matches!(
            result,
            Err(ModelError::InvalidVariableBounds { .. })
        ));
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.next_variable_id(), 0);

        let x = model.add_variable(VariableSpec::continuous()).unwrap();
        assert!(model.set_bounds(x, 2.0, 1.0).is_err());
        model.set_bounds(x, -1.0, 1.0).unwrap();
        assert_eq!(model.get_variable(x).unwrap().bounds(), Bounds::new(-1.0, 1.0));
    }

    #[test]
    fn unknown_variable_is_reported() {
        let mut model = Model::new();
        let missing = VariableId::new(9);
        assert_eq!(
            model.set_branch_priority(missing, 3),
            Err(ModelError::InvalidVariableId(missing))
        );
        assert!(model.solved_value(missing).is_err());
    }
}
