// ABOUTME: Trybuild runner for compile-time type safety tests.
// ABOUTME: Verifies that invalid type usage fails to compile.

#[test]
fn arn_types_not_interchangeable() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/arn_not_interchangeable.rs");
}

#[test]
fn submit_not_available_before_history_is_recorded() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/submit_before_record.rs");
}

#[test]
fn mark_deployed_not_available_before_convergence() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/mark_deployed_before_convergence.rs");
}
