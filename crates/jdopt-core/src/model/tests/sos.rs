use super::support::bounded_block;
use crate::config::ModelConfig;
use crate::model::{Model, ModelError};
use crate::types::{ConstraintSense, SosMode, SosType, VariableSpec, VariableType};

#[test]
fn test_sos1_reformulation_adds_indicators_and_cardinality() {
    let mut model = Model::new();
    let x = bounded_block(&mut model, 1, 4, 0.0, 10.0);
    model.add_sos1(x.ids(), &[1.0, 2.0, 3.0, 4.0]).unwrap();

    // One indicator per member, one upper big-M row each, plus sum(b) <= 1.
    assert_eq!(model.num_variables(), 8);
    assert_eq!(model.binary_variables().len(), 4);
    assert_eq!(model.num_constraints(), 5);
    assert!(model.sos_constraints().is_empty());
    assert_eq!(model.num_sos_sets(), 1);

    let indicator = model.get_variable_by_name("__sos0_nz_2").unwrap();
    assert_eq!(indicator.var_type(), VariableType::Binary);
    let linking = model
        .constraints()
        .find(|c| c.expr().variables().any(|v| v == x.ids()[2]))
        .unwrap();
    assert_eq!(
        linking.expr().normalized_terms(),
        vec![(x.ids()[2], 1.0), (indicator.id(), -10.0)]
    );

    let cardinality = model.constraints().last().unwrap();
    assert_eq!(cardinality.expr().len(), 4);
    assert_eq!(cardinality.rhs(), 1.0);
}

#[test]
fn test_negative_lower_bound_adds_second_big_m_row() {
    let mut model = Model::new();
    let x = bounded_block(&mut model, 1, 2, -5.0, 5.0);
    model.add_sos1(x.ids(), &[1.0, 2.0]).unwrap();
    // Two rows per member plus the cardinality row.
    assert_eq!(model.num_constraints(), 5);

    let indicator = model.get_variable_by_name("__sos0_nz_0").unwrap().id();
    let lower = model.constraints().next().unwrap();
    assert_eq!(
        lower.expr().normalized_terms(),
        vec![(x.ids()[0], -1.0), (indicator, -5.0)]
    );
    assert_eq!(lower.sense(), ConstraintSense::LessEqual);
}

#[test]
fn test_sos2_reformulation_adds_startup_indicators() {
    let mut model = Model::new();
    let x = bounded_block(&mut model, 1, 3, 0.0, 4.0);
    model.add_sos2(x.ids(), &[1.0, 2.0, 3.0]).unwrap();

    // 3 nonzero + 3 startup indicators.
    assert_eq!(model.num_variables(), 9);
    assert_eq!(model.binary_variables().len(), 6);
    // 3 big-M rows, 2 rows per startup, sum(b) <= 2, sum(su) <= 1.
    assert_eq!(model.num_constraints(), 3 + 6 + 2);

    let rhs: Vec<f64> = model.constraints().map(|c| c.rhs()).collect();
    assert_eq!(rhs[rhs.len() - 2], 2.0);
    assert_eq!(rhs[rhs.len() - 1], 1.0);
    assert!(model.get_variable_by_name("__sos0_su_2").is_some());
}

#[test]
fn test_binary_members_are_their_own_indicator() {
    let mut model = Model::new();
    let b = model
        .add_vector(3, VariableSpec::binary())
        .unwrap();
    model.add_sos1(b.ids(), &[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(model.num_variables(), 3);
    assert_eq!(model.num_constraints(), 1);
}

#[test]
fn test_unbounded_member_is_rejected_before_any_change() {
    let mut model = Model::new();
    let bounded = bounded_block(&mut model, 1, 1, 0.0, 10.0);
    let free = model.add_variable(VariableSpec::continuous()).unwrap();
    let members = [bounded.ids()[0], free];
    assert_eq!(
        model.add_sos1(&members, &[1.0, 2.0]),
        Err(ModelError::UnsupportedSemicontinuousBounds {
            var: free,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        })
    );
    assert_eq!(model.num_variables(), 2);
    assert_eq!(model.num_constraints(), 0);
}

#[test]
fn test_domain_excluding_zero_is_rejected() {
    let mut model = Model::new();
    let x = bounded_block(&mut model, 1, 2, 1.0, 10.0);
    assert!(matches!(
        model.add_sos2(x.ids(), &[1.0, 2.0]),
        Err(ModelError::UnsupportedSemicontinuousBounds { .. })
    ));
}

#[test]
fn test_weights_must_match_members() {
    let mut model = Model::new();
    let x = bounded_block(&mut model, 1, 2, 0.0, 10.0);
    assert_eq!(
        model.add_sos1(x.ids(), &[1.0]),
        Err(ModelError::InvalidSosWeights {
            variables: 2,
            weights: 1
        })
    );
}

#[test]
fn test_native_mode_stores_the_set() {
    let mut model = Model::with_config(ModelConfig::new().with_sos_mode(SosMode::Native));
    let x = model
        .add_vector(3, VariableSpec::continuous())
        .unwrap();
    model.add_sos2(x.ids(), &[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(model.num_variables(), 3);
    assert_eq!(model.num_constraints(), 0);
    let stored = &model.sos_constraints()[0];
    assert_eq!(stored.sos_type, SosType::Sos2);
    assert_eq!(stored.variables, x.ids().to_vec());
}

#[test]
fn test_second_set_gets_fresh_indicator_names() {
    let mut model = Model::new();
    let x = bounded_block(&mut model, 1, 2, 0.0, 1.0);
    let y = bounded_block(&mut model, 1, 2, 0.0, 1.0);
    model.add_sos1(x.ids(), &[1.0, 2.0]).unwrap();
    model.add_sos1(y.ids(), &[1.0, 2.0]).unwrap();
    assert!(model.get_variable_by_name("__sos1_nz_1").is_some());
}
