// Integration tests module

mod integration {
    mod support;

    mod cli_test;
    mod pipeline_test;
    mod producer_isolation_test;
}
