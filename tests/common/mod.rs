//! Test utilities and helper functions for the html_bleach test suite

use html_bleach::{CleanOptions, clean};

/// Wraps a body fragment (and optional head content) in a bare document
#[allow(dead_code)]
pub fn doc(fragment: &str) -> String {
    doc_with_head(fragment, "")
}

#[allow(dead_code)]
pub fn doc_with_head(fragment: &str, head: &str) -> String {
    format!("<html><head>{head}</head><body>{fragment}</body></html>")
}

/// Asserts that `dirty` cleans to `expected` both as a fragment and when
/// wrapped in a full document
#[allow(dead_code)]
pub fn assert_clean_frag_and_doc(expected: &str, dirty: &str, options: &CleanOptions) {
    let fragment = CleanOptions {
        parse_as_fragment: true,
        ..options.clone()
    };
    assert_eq!(
        clean(dirty, &fragment).expect("fragment clean succeeds"),
        expected,
        "fragment mode, input: {dirty:?}"
    );

    let document = CleanOptions {
        parse_as_fragment: false,
        ..options.clone()
    };
    assert_eq!(
        clean(&doc(dirty), &document).expect("document clean succeeds"),
        doc(expected),
        "document mode, input: {dirty:?}"
    );
}

/// Installs a test subscriber so `RUST_LOG=html_bleach=trace` shows filter decisions
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
