//! End-to-end query runs against the 999 acknowledgment fixture

use std::fs;
use std::path::Path;

use rstest::rstest;

use ediq::errors::EdiError;
use ediq::parser::InterchangeParser;
use ediq::schema::TransactionSchema;
use ediq::serializer::serialize;
use ediq::util::testing;
use ediq::{run_query, QueryOptions};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn fixture() -> String {
    fs::read_to_string("tests/resources/simple999.edi").expect("read fixture")
}

fn schema() -> TransactionSchema {
    TransactionSchema::load(Path::new("tests/resources/schema999.toml")).expect("load schema")
}

fn run(epath: &str, schema: Option<&TransactionSchema>, format: bool) -> String {
    let options = QueryOptions {
        epath,
        schema,
        format,
    };
    let mut out = Vec::new();
    run_query(&fixture(), &options, &mut out).expect("query succeeds");
    String::from_utf8(out).expect("utf8 output")
}

// ============================================================
// Segment / Element / Composite Selection
// ============================================================

#[test]
fn given_ak2_selection_when_querying_then_each_segment_is_one_record() {
    let output = run("//AK2", None, false);
    assert_eq!(output, "AK2*837*0001~\nAK2*837*0002~\nAK2*837*0003~\n");
}

#[test]
fn given_component_selection_when_querying_then_values_print_in_document_order() {
    let output = run("//CTX01-02", None, false);
    assert_eq!(output, "123456789\n2\n3\n987654321\n");
}

#[test]
fn given_composite_selection_when_querying_then_components_join_with_separator() {
    let output = run("//CTX05", None, false);
    assert_eq!(output, "5:3\n");
}

#[test]
fn given_no_matches_when_querying_then_zero_records() {
    let output = run("//ZZZ", None, false);
    assert_eq!(output, "");
}

#[test]
fn given_invalid_expression_when_querying_then_selection_error() {
    let options = QueryOptions {
        epath: "AK2",
        schema: None,
        format: false,
    };
    let mut out = Vec::new();
    let result = run_query(&fixture(), &options, &mut out);
    assert!(matches!(result, Err(EdiError::Selection { .. })));
    assert!(out.is_empty());
}

// ============================================================
// Loop Selection With Schema
// ============================================================

#[rstest]
#[case(false, "IK4*2*782*1~\n")]
#[case(true, "IK4*2*782*1~\n\n")] // line-formatted adds one terminator per segment
fn given_l0003_selection_when_querying_then_single_ik4_loop(
    #[case] format: bool,
    #[case] expected: &str,
) {
    let schema = schema();
    let output = run("//L0003", Some(&schema), format);
    assert_eq!(output, expected);
}

#[test]
fn given_nested_loop_selection_when_querying_then_inner_loops_inline() {
    let schema = schema();
    let output = run("//L0002", Some(&schema), true);
    assert_eq!(
        output,
        "IK3*CLM*22**8~\n\
         CTX*CLM01:123456789~\n\
         IK4*2*782*1~\n\
         \n\
         IK3*REF*57**3~\n\
         CTX*SITUATIONAL TRIGGER^SITUATIONAL TRIGGER:2^SITUATIONAL TRIGGER:3*CLM*43**5:3*1325~\n\
         CTX*CLM01:987654321~\n\
         \n"
    );
}

#[test]
fn given_l0002_selection_without_format_when_querying_then_segments_concatenate() {
    let schema = schema();
    let output = run("//L0002", Some(&schema), false);
    assert_eq!(
        output,
        "IK3*CLM*22**8~CTX*CLM01:123456789~IK4*2*782*1~\n\
         IK3*REF*57**3~CTX*SITUATIONAL TRIGGER^SITUATIONAL TRIGGER:2^SITUATIONAL TRIGGER:3\
         *CLM*43**5:3*1325~CTX*CLM01:987654321~\n"
    );
}

// ============================================================
// Round Trip
// ============================================================

#[test]
fn given_valid_interchange_when_serializing_the_root_then_input_reproduced_exactly() {
    // Only the newlines after each terminator are cosmetic
    let input = fixture().replace('\n', "");
    let interchange = InterchangeParser::new().parse(&input).unwrap();
    let output = serialize(&interchange.root, &interchange.delimiters, false);
    assert_eq!(output, input);
}
