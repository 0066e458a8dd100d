//! End-to-end tests of the CLI controllers wired to the offline mock client.

use std::sync::Arc;

use ragchat::connector::api::controller::{AskController, ChatController, SettingsController};
use ragchat::connector::api::Container;
use ragchat::{ChatResponse, MockCompletionClient, Settings};

fn container() -> Container {
    let settings = Settings::new()
        .with_openai_endpoint("https://example.openai.azure.com")
        .with_gpt_deployment("gpt-4o")
        .with_search_service_url("https://example.search.windows.net")
        .with_search_index_name("docs-v1");
    Container::with_client(settings, Arc::new(MockCompletionClient::new())).unwrap()
}

#[tokio::test]
async fn test_ask_prints_answer_and_citation() {
    let container = container();
    let controller = AskController::new(&container);

    let output = controller
        .ask("What is the leave policy?".to_string(), false)
        .await
        .unwrap();

    assert!(output.starts_with("You asked: What is the leave policy? [doc1]"));
    assert!(output.contains("Citations:"));
    assert!(output.contains("[doc1] docs-v1 (mock)"));
}

#[tokio::test]
async fn test_ask_json_round_trips_response() {
    let container = container();
    let controller = AskController::new(&container);

    let output = controller.ask("hello".to_string(), true).await.unwrap();
    let response: ChatResponse = serde_json::from_str(&output).unwrap();

    assert_eq!(response.text(), "You asked: hello [doc1]");
    assert_eq!(response.citations.len(), 1);
    assert!(response.error.is_none());
}

#[tokio::test]
async fn test_chat_loop_answers_until_exit() {
    let container = container();
    let controller = ChatController::new(&container);
    let input: &[u8] = b"first question\n\n/reset\nsecond question\n/exit\nnever asked\n";
    let mut output = Vec::new();

    let answered = controller.run(input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert_eq!(answered, 2);
    assert!(text.contains("You asked: first question"));
    assert!(text.contains("Conversation cleared."));
    assert!(text.contains("You asked: second question"));
    assert!(!text.contains("never asked"));
}

#[tokio::test]
async fn test_chat_loop_stops_at_eof() {
    let container = container();
    let controller = ChatController::new(&container);
    let input: &[u8] = b"only question";
    let mut output = Vec::new();

    let answered = controller.run(input, &mut output).await.unwrap();

    assert_eq!(answered, 1);
}

#[tokio::test]
async fn test_settings_show_semantic_configuration() {
    let container = container();
    let controller = SettingsController::new(&container);

    let output = controller.show().await.unwrap();

    assert!(output.contains("docs-v1-semantic-configuration"));
    assert!(output.contains("Embedding Deployment: (not set)"));
}

#[test]
fn test_container_rejects_incomplete_settings() {
    let settings = Settings::new().with_openai_endpoint("https://example.openai.azure.com");
    let result = Container::with_client(settings, Arc::new(MockCompletionClient::new()));
    assert!(result.is_err());
}
