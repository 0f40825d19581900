use std::sync::Arc;

use jdopt_expr::{Coefficient, SymbolicConstant};

use super::support::{assign_values, bounded_block};
use crate::config::ModelConfig;
use crate::matrix::Compare;
use crate::model::{ConstraintOptions, FORMAT_VERSION, Model, ModelError};
use crate::types::{Bounds, SosMode, SosType, VariableSpec, VariableType};

fn first_named_leaf(coeff: &Coefficient) -> Option<Arc<jdopt_expr::Leaf>> {
    let Coefficient::Symbolic(constant) = coeff else {
        return None;
    };
    let mut found = None;
    constant.for_each_leaf(&mut |leaf| {
        if found.is_none() && leaf.name().is_some() {
            found = Some(Arc::clone(leaf));
        }
    });
    found
}

fn priced_model(config: ModelConfig) -> Model {
    let mut model = Model::with_config(config);
    let x = bounded_block(&mut model, 1, 2, 0.0, 10.0);
    let price = model.named_constant("price", 2.0);
    let priced = model.mul(price, &x).unwrap();
    model
        .add_constraint((&priced).le(8.0), ConstraintOptions::named("budget"))
        .unwrap();
    let total = model.sum(&priced).unwrap();
    model.maximize(&total).unwrap();
    model
}

#[test]
fn test_json_round_trip_keeps_structure() {
    let mut model = priced_model(ModelConfig::new());
    let flag = model
        .add_variable(VariableSpec::binary().with_name("flag").with_branch_priority(3))
        .unwrap();
    let free = model
        .add_variable(VariableSpec::continuous().with_name("free"))
        .unwrap();
    assign_values(&mut model, &[(flag, 1.0)]);

    let json = model.to_json_string().unwrap();
    let loaded = Model::from_json_str(&json).unwrap();

    assert_eq!(loaded.num_variables(), 4);
    assert_eq!(loaded.num_constraints(), 2);
    assert_eq!(loaded.next_variable_id(), model.next_variable_id());
    assert_eq!(loaded.next_constraint_id(), model.next_constraint_id());
    assert_eq!(loaded.to_document(), model.to_document());

    let flag = loaded.get_variable(flag).unwrap();
    assert_eq!(flag.var_type(), VariableType::Binary);
    assert_eq!(flag.branch_priority(), 3);
    assert_eq!(flag.solved_value(), Some(1.0));
    assert_eq!(
        loaded.get_variable(free).unwrap().bounds(),
        Bounds::free()
    );

    let budget = loaded.get_constraint_by_name("budget[1]").unwrap();
    assert_eq!(budget.rhs(), 8.0);
    assert_eq!(budget.expr().normalized_terms()[0].1, 2.0);
    assert_eq!(loaded.objective().unwrap().expr.len(), 2);
}

#[test]
fn test_reloaded_constant_reaches_every_expression() {
    let model = priced_model(ModelConfig::new().with_data_loadable(true));
    let mut buffer = Vec::new();
    model.write_json(&mut buffer).unwrap();
    let loaded = Model::read_json(buffer.as_slice()).unwrap();

    assert!(loaded.is_data_loadable());
    assert_eq!(loaded.constant_value("price").unwrap(), 2.0);
    assert!(loaded.set_constant("price", 7.0));

    for constraint in loaded.constraints() {
        assert_eq!(constraint.expr().normalized_terms()[0].1, 7.0);
    }
    let objective = &loaded.objective().unwrap().expr;
    assert!(objective.normalized_terms().iter().all(|(_, c)| *c == 7.0));

    // The source model is unaffected.
    assert_eq!(model.constant_value("price").unwrap(), 2.0);
}

#[test]
fn test_plain_model_shares_leaves_after_load() {
    let mut model = Model::new();
    let x = bounded_block(&mut model, 1, 2, 0.0, 10.0);
    let price = SymbolicConstant::named("price", 3.0);
    let priced = model.mul(price, &x).unwrap();
    model.add_constraint((&priced).le(9.0), ConstraintOptions::new()).unwrap();
    model.minimize(&priced).unwrap();

    let loaded = Model::from_document(model.to_document()).unwrap();
    assert!(!loaded.is_data_loadable());
    assert!(!loaded.set_constant("price", 1.0));

    let leaves: Vec<_> = loaded
        .constraints()
        .filter_map(|c| first_named_leaf(c.expr().terms()[0].coeff()))
        .collect();
    assert_eq!(leaves.len(), 2);
    assert!(Arc::ptr_eq(&leaves[0], &leaves[1]));

    leaves[0].set_value(4.0);
    let second = loaded.constraints().nth(1).unwrap();
    assert_eq!(second.expr().normalized_terms()[0].1, 4.0);
}

#[test]
fn test_native_sos_survives_round_trip() {
    let mut model = Model::with_config(ModelConfig::new().with_sos_mode(SosMode::Native));
    let x = bounded_block(&mut model, 1, 3, 0.0, 1.0);
    model.add_sos2(x.ids(), &[1.0, 2.0, 3.0]).unwrap();

    let loaded = Model::from_json_str(&model.to_json_string().unwrap()).unwrap();
    assert_eq!(loaded.config().sos_mode, SosMode::Native);
    assert_eq!(loaded.num_sos_sets(), 1);
    let set = &loaded.sos_constraints()[0];
    assert_eq!(set.sos_type, SosType::Sos2);
    assert_eq!(set.weights, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_version_mismatch_is_rejected() {
    let model = priced_model(ModelConfig::new());
    let mut document = model.to_document();
    document.format_version = FORMAT_VERSION + 1;
    assert!(matches!(
        Model::from_document(document),
        Err(ModelError::Persistence { .. })
    ));
}

#[test]
fn test_bad_documents_are_rejected() {
    let model = priced_model(ModelConfig::new());

    let mut document = model.to_document();
    document.variables[0].var_type = "semicontinuous".to_string();
    assert!(matches!(
        Model::from_document(document),
        Err(ModelError::UnknownVariableType { .. })
    ));

    let mut document = model.to_document();
    let duplicate = document.variables[0].clone();
    document.variables.push(duplicate);
    assert_eq!(
        Model::from_document(document).err(),
        Some(ModelError::IdCollision {
            kind: "variable",
            id: 0
        })
    );

    let mut document = model.to_document();
    document.constraints[0].sense = "ge".to_string();
    assert!(matches!(
        Model::from_document(document),
        Err(ModelError::Persistence { .. })
    ));

    assert!(matches!(
        Model::from_json_str("{ not json"),
        Err(ModelError::Persistence { .. })
    ));
}

#[test]
fn test_counters_cover_loaded_ids() {
    let model = priced_model(ModelConfig::new());
    let mut document = model.to_document();
    document.next_variable_id = 0;
    document.next_constraint_id = 0;
    let loaded = Model::from_document(document).unwrap();
    assert_eq!(loaded.next_variable_id(), 2);
    assert_eq!(loaded.next_constraint_id(), 2);
}
