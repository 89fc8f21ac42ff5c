// Integration tests for pruner

mod integration {
    mod analysis_test;
    mod end_to_end_test;
    mod removal_test;
    mod support;
}
