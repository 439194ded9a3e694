use pagediff::{CompareConfig, DocumentSource, Options, PageDiffError, compare_files};

#[tokio::test(flavor = "multi_thread")]
async fn missing_input_is_captured_in_the_result() {
    let result = compare_files(
        DocumentSource::Path("/no/such/baseline.pdf".into()),
        DocumentSource::Path("/no/such/actual.pdf".into()),
        Options::default(),
    )
    .await;

    assert!(!result.passed());
    assert_eq!(result.verdict.message, "Failed to compare the files");
    assert!(result.verdict.different_pages.is_empty());
    assert!(matches!(
        result.error,
        Some(PageDiffError::FileNotFound { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn exclusion_set_is_echoed_even_when_the_run_fails() {
    let options = Options {
        compare: CompareConfig {
            excluded_pages: vec![3, 9],
            ..CompareConfig::default()
        },
        ..Options::default()
    };
    let result = compare_files(
        DocumentSource::Path("/no/such/baseline.pdf".into()),
        DocumentSource::Path("/no/such/actual.pdf".into()),
        options,
    )
    .await;

    assert!(!result.passed());
    assert_eq!(result.verdict.excluded_pages, vec![3, 9]);
}
