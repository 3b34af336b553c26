use modenrich::scorer::{ScorerParseError, parse};

#[test]
fn nan_module_is_excluded_before_correction() {
    let raw = "[[ '1', ['g1','g2'], array([0.1,0.2]), 0.05], [ '2', ['g3'], array([nan]), nan]]";
    let parsed = parse(raw).unwrap();
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].module_index, 1);
    assert_eq!(parsed.records[0].genes, vec!["g1", "g2"]);
    assert_eq!(parsed.records[0].pvalue, 0.05);
    assert_eq!(parsed.dropped_nan, vec![2]);
    assert_eq!(parsed.total(), 2);
}

#[test]
fn line_per_record_with_wrapped_arrays() {
    let raw = "['3', ['A', 'B'], array([1.0e-04,\n       2.5e-01]), 0.0012]\n\
               ['4', [], array([], dtype=float64), nan]\n";
    let parsed = parse(raw).unwrap();
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].pvalue, 0.0012);
    assert_eq!(parsed.dropped_nan, vec![4]);
}

#[test]
fn truncated_record_is_fatal() {
    let err = parse("['1', ['A'], array([0.1]), 0.5]\n['2', ['B'], array([0.1").unwrap_err();
    assert!(matches!(err, ScorerParseError::UnexpectedEof { .. }));
}

#[test]
fn missing_field_is_rejected() {
    let err = parse("['1', ['A'], 0.5]").unwrap_err();
    assert!(matches!(err, ScorerParseError::Unexpected { .. }));
}

#[test]
fn unbalanced_outer_list_is_rejected() {
    assert!(parse("[['1', ['A'], array([0.1]), 0.5]").is_err());
    assert!(parse("['1', ['A'], array([0.1]), 0.5]]").is_err());
}

#[test]
fn non_integer_index_is_rejected() {
    let err = parse("['x1', ['A'], array([0.1]), 0.5]").unwrap_err();
    assert!(matches!(err, ScorerParseError::InvalidIndex { .. }));
}

#[test]
fn pvalue_outside_unit_interval_is_rejected() {
    let err = parse("['1', ['A'], array([0.1]), 1.5]").unwrap_err();
    assert!(matches!(err, ScorerParseError::PvalueOutOfRange { .. }));
}

#[test]
fn repeated_module_index_is_rejected() {
    let raw = "['1', ['A'], array([0.1]), 0.5]\n['1', ['B'], array([0.2]), 0.4]";
    assert!(matches!(
        parse(raw).unwrap_err(),
        ScorerParseError::DuplicateIndex { index: 1, .. }
    ));
}

#[test]
fn deeply_nested_scalar_wrappers_are_an_error() {
    let depth = 200_000;
    let raw = format!(
        "[1, ['A'], array([{}1{}]), 0.5]",
        "f(".repeat(depth),
        ")".repeat(depth)
    );
    assert!(parse(&raw).is_err());
}

#[test]
fn single_scalar_wrapper_is_accepted() {
    let parsed = parse("['2', ['A'], array([np.float64(0.5)]), np.float64(0.03)]").unwrap();
    assert_eq!(parsed.records[0].pvalue, 0.03);
}
