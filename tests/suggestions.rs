mod common;

use common::{bench, task, task_with_context, MockTaskService};
use opener_for_asana::formatter::format_task_label;
use opener_for_asana::suggest::SuggestionProvider;
use opener_for_asana::token::{decode_token, DecodeMode, Decoded};

#[tokio::test]
async fn one_suggestion_per_result_in_remote_order() {
    let tasks = vec![
        task_with_context("11", "Write report", "Quarterly", "Ops"),
        task("22", "Buy milk", true),
        task("33", "Call dentist", false),
    ];
    let service = MockTaskService::with_tasks(tasks.clone());
    let provider = SuggestionProvider::new(bench().platform, service.clone());

    let suggestions = provider.pull_suggestions("foo").await.unwrap();

    assert_eq!(suggestions.len(), 3);
    for (suggestion, task) in suggestions.iter().zip(&tasks) {
        assert_eq!(suggestion.text, "foo");
        assert_eq!(suggestion.description, format_task_label(task).unwrap());
        assert_eq!(
            decode_token(&suggestion.url, DecodeMode::Strict).unwrap(),
            Decoded::TaskGid(task.gid.clone())
        );
    }
    // Remote ranking preserved verbatim.
    assert_eq!(suggestions[0].description, "Write report / Quarterly (Ops)");
    assert_eq!(suggestions[1].description, "✓ Buy milk");
}

#[tokio::test]
async fn query_text_is_forwarded_unmodified() {
    let service = MockTaskService::with_tasks(Vec::new());
    let provider = SuggestionProvider::new(bench().platform, service.clone());

    provider.pull_suggestions("  ").await.unwrap();
    provider.pull_suggestions("").await.unwrap();

    // No local short-circuit: degenerate input still reaches the service.
    assert_eq!(*service.searches.lock().unwrap(), vec!["  ", ""]);
}

#[tokio::test]
async fn unformattable_result_fails_the_whole_query() {
    let mut nameless = task("44", "", false);
    nameless.name = None;
    let service = MockTaskService::with_tasks(vec![task("11", "Ok", false), nameless]);
    let provider = SuggestionProvider::new(bench().platform, service);

    assert!(provider.pull_suggestions("foo").await.is_err());
}
