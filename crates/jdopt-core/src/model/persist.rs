//! Serializable model documents.
//!
//! A [`ModelDocument`] is a plain snapshot of a model. Variables are referenced
//! by id. Named constants are written at every occurrence; on load they are
//! rewired onto one leaf per name, so reloading a value after a round trip
//! still reaches every expression that uses it.

use std::io::{Read, Write};
use std::sync::Arc;

use jdopt_expr::{
    BinaryOp, Coefficient, ConstraintId, Leaf, LinExpr, NamedConstRegistry, SymbolicConstant,
    Term, UnaryOp, VariableId,
};
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::model::Model;
use crate::model::error::ModelError;
use crate::types::{
    Bounds, Constraint, ConstraintSense, Objective, Sense, SosConstraint, SosMode, SosType,
    Variable, VariableSpec, VariableType,
};

/// Version written into every document. Documents with another version are
/// rejected on load.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub format_version: u32,
    pub sos_mode: String,
    pub data_loadable: bool,
    pub next_variable_id: u32,
    pub next_constraint_id: u32,
    pub sos_count: u32,
    /// Continuous pool, then binary, then integer, each in pool order.
    pub variables: Vec<VariableDoc>,
    /// `<=` pool, then `=` pool.
    pub constraints: Vec<ConstraintDoc>,
    pub sos: Vec<SosDoc>,
    pub objective: Option<ObjectiveDoc>,
    /// Registry snapshot of a data-loadable model.
    pub constants: Vec<NamedValueDoc>,
}

/// `None` bounds stand for the matching infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDoc {
    pub id: u32,
    pub name: Option<String>,
    pub var_type: String,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub branch_priority: u8,
    pub solved_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDoc {
    pub id: u32,
    pub name: Option<String>,
    pub sense: String,
    pub lazy_level: u8,
    pub expr: ExprDoc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosDoc {
    pub sos_type: String,
    pub variables: Vec<u32>,
    pub weights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveDoc {
    pub sense: String,
    pub name: Option<String>,
    pub expr: ExprDoc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprDoc {
    pub terms: Vec<TermDoc>,
    pub constant: CoefficientDoc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDoc {
    pub var: u32,
    pub coeff: CoefficientDoc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoefficientDoc {
    Literal { value: f64 },
    Symbolic { constant: ConstantDoc },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ConstantDoc {
    Leaf {
        name: Option<String>,
        value: f64,
    },
    Binary {
        op: String,
        left: Box<ConstantDoc>,
        right: Box<ConstantDoc>,
    },
    Unary {
        op: String,
        operand: Box<ConstantDoc>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValueDoc {
    pub name: String,
    pub value: f64,
}

impl Model {
    /// Snapshot the model. The expression arena and the last solve report
    /// are not part of the document.
    pub fn to_document(&self) -> ModelDocument {
        let config = self.config();
        let variables = self
            .continuous
            .iter()
            .chain(&self.binary)
            .chain(&self.integer)
            .filter_map(|id| self.variables.get(id))
            .map(variable_doc)
            .collect();
        let constraints = self
            .constraints()
            .map(|constraint| ConstraintDoc {
                id: constraint.id().inner(),
                name: constraint.name().map(ToString::to_string),
                sense: constraint.sense().as_str().to_string(),
                lazy_level: constraint.lazy_level(),
                expr: expr_doc(constraint.expr()),
            })
            .collect();
        let sos = self
            .sos
            .iter()
            .map(|set| SosDoc {
                sos_type: set.sos_type.as_str().to_string(),
                variables: set.variables.iter().map(|id| id.inner()).collect(),
                weights: set.weights.clone(),
            })
            .collect();
        let objective = self.objective.as_ref().map(|objective| ObjectiveDoc {
            sense: objective.sense.as_str().to_string(),
            name: objective.name.clone(),
            expr: expr_doc(&objective.expr),
        });
        let constants = self
            .registry
            .as_ref()
            .map(|registry| {
                registry
                    .values()
                    .into_iter()
                    .map(|(name, value)| NamedValueDoc { name, value })
                    .collect()
            })
            .unwrap_or_default();

        ModelDocument {
            format_version: FORMAT_VERSION,
            sos_mode: config.sos_mode.as_str().to_string(),
            data_loadable: self.is_data_loadable(),
            next_variable_id: self.next_variable_id,
            next_constraint_id: self.next_constraint_id,
            sos_count: self.sos_count,
            variables,
            constraints,
            sos,
            objective,
            constants,
        }
    }

    /// Rebuild a model from a snapshot.
    ///
    /// Named leaves are unified per name: against the rebuilt registry for a
    /// data-loadable model, against a load-local one otherwise.
    pub fn from_document(document: ModelDocument) -> Result<Model, ModelError> {
        if document.format_version != FORMAT_VERSION {
            return Err(ModelError::Persistence {
                reason: format!(
                    "unsupported format version {} (expected {})",
                    document.format_version, FORMAT_VERSION
                ),
            });
        }
        let sos_mode = parse_sos_mode(&document.sos_mode)?;
        let config = ModelConfig::new()
            .with_sos_mode(sos_mode)
            .with_data_loadable(document.data_loadable);
        let mut model = Model::with_config(config);

        for doc in document.variables {
            let id = VariableId::new(doc.id);
            if model.variables.contains_key(&id) {
                return Err(ModelError::IdCollision {
                    kind: "variable",
                    id: doc.id,
                });
            }
            let var_type: VariableType = doc.var_type.parse()?;
            let bounds = Bounds::new(
                doc.lower.unwrap_or(f64::NEG_INFINITY),
                doc.upper.unwrap_or(f64::INFINITY),
            );
            if !bounds.is_valid() {
                return Err(ModelError::InvalidVariableBounds {
                    lower: bounds.lower,
                    upper: bounds.upper,
                });
            }
            let mut spec = VariableSpec::new(var_type)
                .with_bounds(bounds.lower, bounds.upper)
                .with_branch_priority(doc.branch_priority);
            spec.name = doc.name;
            let mut variable = Variable::new(id, spec);
            variable.solved_value = doc.solved_value;
            model.variables.insert(id, variable);
            model.pool_mut(var_type).push(id);
        }

        let mut constants = match model.registry.take() {
            Some(mut registry) => {
                for named in &document.constants {
                    registry.constant(&named.name, named.value);
                }
                registry
            }
            None => NamedConstRegistry::new(),
        };

        for doc in document.constraints {
            let id = ConstraintId::new(doc.id);
            if model.constraints.contains_key(&id) {
                return Err(ModelError::IdCollision {
                    kind: "constraint",
                    id: doc.id,
                });
            }
            let sense = parse_constraint_sense(&doc.sense)?;
            let expr = model.rebuild_expr(doc.expr, &mut constants)?;
            model
                .constraints
                .insert(id, Constraint::new(id, expr, sense, doc.name, doc.lazy_level));
            model.constraint_pool_mut(sense).push(id);
        }

        for doc in document.sos {
            let variables = doc
                .variables
                .iter()
                .map(|&raw| {
                    let id = VariableId::new(raw);
                    model.ensure_variable_exists(id).map(|()| id)
                })
                .collect::<Result<Vec<_>, _>>()?;
            if variables.len() != doc.weights.len() {
                return Err(ModelError::InvalidSosWeights {
                    variables: variables.len(),
                    weights: doc.weights.len(),
                });
            }
            model.sos.push(SosConstraint {
                variables,
                weights: doc.weights,
                sos_type: parse_sos_type(&doc.sos_type)?,
            });
        }

        if let Some(doc) = document.objective {
            let sense = parse_sense(&doc.sense)?;
            let expr = model.rebuild_expr(doc.expr, &mut constants)?;
            let mut objective = Objective::new(expr, sense);
            objective.name = doc.name;
            model.objective = Some(objective);
        }

        if document.data_loadable {
            model.registry = Some(constants);
        }

        let max_variable = model.variables.keys().next_back().map_or(0, |id| id.inner() + 1);
        let max_constraint = model
            .constraints
            .keys()
            .next_back()
            .map_or(0, |id| id.inner() + 1);
        model.next_variable_id = document.next_variable_id.max(max_variable);
        model.next_constraint_id = document.next_constraint_id.max(max_constraint);
        model.sos_count = document.sos_count;

        tracing::debug!(
            component = "model",
            operation = "from_document",
            status = "success",
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            data_loadable = model.is_data_loadable(),
            "Loaded model document"
        );
        Ok(model)
    }

    fn rebuild_expr(
        &self,
        doc: ExprDoc,
        constants: &mut NamedConstRegistry,
    ) -> Result<LinExpr, ModelError> {
        let mut terms = Vec::with_capacity(doc.terms.len());
        for term in doc.terms {
            let var = VariableId::new(term.var);
            self.ensure_variable_exists(var)?;
            terms.push(Term::new(var, coefficient_from_doc(term.coeff)?));
        }
        let mut expr = LinExpr::from_terms(terms, coefficient_from_doc(doc.constant)?);
        expr.register_named_leaves(constants);
        expr.deduplicate(constants);
        Ok(expr)
    }

    /// Serialize the model as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ModelError> {
        serde_json::to_writer_pretty(writer, &self.to_document())?;
        Ok(())
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Model, ModelError> {
        let document: ModelDocument = serde_json::from_reader(reader)?;
        Model::from_document(document)
    }

    pub fn to_json_string(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json_str(json: &str) -> Result<Model, ModelError> {
        let document: ModelDocument = serde_json::from_str(json)?;
        Model::from_document(document)
    }
}

fn variable_doc(var: &Variable) -> VariableDoc {
    let bounds = var.bounds();
    VariableDoc {
        id: var.id().inner(),
        name: var.name().map(ToString::to_string),
        var_type: var.var_type().as_str().to_string(),
        lower: bounds.lower.is_finite().then_some(bounds.lower),
        upper: bounds.upper.is_finite().then_some(bounds.upper),
        branch_priority: var.branch_priority(),
        solved_value: var.solved_value(),
    }
}

fn expr_doc(expr: &LinExpr) -> ExprDoc {
    ExprDoc {
        terms: expr
            .terms()
            .iter()
            .map(|term| TermDoc {
                var: term.var().inner(),
                coeff: coefficient_doc(term.coeff()),
            })
            .collect(),
        constant: coefficient_doc(expr.constant()),
    }
}

fn coefficient_doc(coeff: &Coefficient) -> CoefficientDoc {
    match coeff {
        Coefficient::Literal(value) => CoefficientDoc::Literal { value: *value },
        Coefficient::Symbolic(constant) => CoefficientDoc::Symbolic {
            constant: constant_doc(constant),
        },
    }
}

fn constant_doc(constant: &SymbolicConstant) -> ConstantDoc {
    match constant {
        SymbolicConstant::Leaf(leaf) => ConstantDoc::Leaf {
            name: leaf.name().map(ToString::to_string),
            value: leaf.value(),
        },
        SymbolicConstant::Binary { op, left, right } => ConstantDoc::Binary {
            op: op.symbol().to_string(),
            left: Box::new(constant_doc(left)),
            right: Box::new(constant_doc(right)),
        },
        SymbolicConstant::Unary { op, operand } => ConstantDoc::Unary {
            op: match op {
                UnaryOp::Abs => "abs".to_string(),
            },
            operand: Box::new(constant_doc(operand)),
        },
    }
}

fn coefficient_from_doc(doc: CoefficientDoc) -> Result<Coefficient, ModelError> {
    Ok(match doc {
        CoefficientDoc::Literal { value } => Coefficient::Literal(value),
        CoefficientDoc::Symbolic { constant } => {
            Coefficient::Symbolic(constant_from_doc(constant)?)
        }
    })
}

fn constant_from_doc(doc: ConstantDoc) -> Result<SymbolicConstant, ModelError> {
    Ok(match doc {
        ConstantDoc::Leaf { name, value } => {
            SymbolicConstant::from_leaf(Arc::new(Leaf::new(name, value)))
        }
        ConstantDoc::Binary { op, left, right } => {
            let op = match op.as_str() {
                "+" => BinaryOp::Add,
                "-" => BinaryOp::Sub,
                "*" => BinaryOp::Mul,
                "/" => BinaryOp::Div,
                "^" => BinaryOp::Pow,
                other => return Err(unknown_value("constant operator", other)),
            };
            SymbolicConstant::binary(op, constant_from_doc(*left)?, constant_from_doc(*right)?)
        }
        ConstantDoc::Unary { op, operand } => {
            let op = match op.as_str() {
                "abs" => UnaryOp::Abs,
                other => return Err(unknown_value("constant operator", other)),
            };
            SymbolicConstant::Unary {
                op,
                operand: Box::new(constant_from_doc(*operand)?),
            }
        }
    })
}

fn unknown_value(field: &str, value: &str) -> ModelError {
    ModelError::Persistence {
        reason: format!("unknown {field} '{value}'"),
    }
}

fn parse_sos_mode(value: &str) -> Result<SosMode, ModelError> {
    match value {
        "native" => Ok(SosMode::Native),
        "reformulate" => Ok(SosMode::Reformulate),
        other => Err(unknown_value("SOS mode", other)),
    }
}

fn parse_sos_type(value: &str) -> Result<SosType, ModelError> {
    match value {
        "sos1" => Ok(SosType::Sos1),
        "sos2" => Ok(SosType::Sos2),
        other => Err(unknown_value("SOS type", other)),
    }
}

fn parse_constraint_sense(value: &str) -> Result<ConstraintSense, ModelError> {
    match value {
        "le" => Ok(ConstraintSense::LessEqual),
        "eq" => Ok(ConstraintSense::Equal),
        other => Err(unknown_value("constraint sense", other)),
    }
}

fn parse_sense(value: &str) -> Result<Sense, ModelError> {
    match value {
        "minimize" => Ok(Sense::Minimize),
        "maximize" => Ok(Sense::Maximize),
        other => Err(unknown_value("objective sense", other)),
    }
}
