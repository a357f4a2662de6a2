//! Pipeline tests against a mock site and a scripted text generator.

mod common;

use common::{pipeline_with, ScriptedGenerator, ARTICLE_HTML};
use web_digest::error::AppError;
use web_digest::extract::extract;
use web_digest::fetch::PageFetcher;
use web_digest::pipeline::ScrapeOutcome;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_article() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTICLE_HTML, "text/html"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn scrape_without_summary_equals_extract_of_fetch() {
    let server = serve_article().await;
    let url = format!("{}/article", server.uri());
    let generator = ScriptedGenerator::replying("should not be used");
    let pipeline = pipeline_with(generator.clone());

    let outcome = pipeline.run_scrape_pipeline(&url, false, 200).await.unwrap();

    let fetched = PageFetcher::new(&common::test_config())
        .unwrap()
        .fetch(&url)
        .await
        .unwrap();
    let expected = extract(&fetched.raw_html, &fetched.source_url);

    assert_eq!(outcome, ScrapeOutcome::Extracted(expected.clone()));
    assert_eq!(
        expected.text,
        "# Crabs of the Week\n\nFerris molted twice this week.\n\n- Shell size: large\n- Mood: cheerful"
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn scrape_with_summary_feeds_extracted_text_to_model() {
    let server = serve_article().await;
    let url = format!("{}/article", server.uri());
    let generator = ScriptedGenerator::replying("- Ferris molted twice.");
    let pipeline = pipeline_with(generator.clone());

    let outcome = pipeline.run_scrape_pipeline(&url, true, 40).await.unwrap();

    match outcome {
        ScrapeOutcome::Summarized {
            source_url,
            summary,
        } => {
            assert_eq!(source_url, url);
            assert_eq!(summary.text, "- Ferris molted twice.");
            assert!(summary.within_limit);
        }
        other => panic!("expected a summary, got {:?}", other),
    }

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Ferris molted twice this week."));
    assert!(prompts[0].contains("under 40 words"));
    assert!(prompts[0].contains(&url));
    assert!(!prompts[0].contains("track()"));
    assert!(!prompts[0].contains("<article>"));
}

#[tokio::test]
async fn failed_summary_does_not_fall_back_to_extracted_text() {
    let server = serve_article().await;
    let url = format!("{}/article", server.uri());
    let pipeline = pipeline_with(ScriptedGenerator::failing());

    let err = pipeline.run_scrape_pipeline(&url, true, 100).await.unwrap_err();

    assert!(matches!(err, AppError::Summarization(msg) if msg.contains("503")));
}

#[tokio::test]
async fn non_200_fetch_aborts_before_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not here</h1>"))
        .mount(&server)
        .await;
    let generator = ScriptedGenerator::replying("unused");
    let pipeline = pipeline_with(generator.clone());

    let err = pipeline
        .run_scrape_pipeline(&format!("{}/404", server.uri()), true, 100)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::FetchStatus { status: 404 }));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn conversation_pipeline_only_calls_the_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let generator = ScriptedGenerator::replying("- User wants the weather; AI said sunny.");
    let pipeline = pipeline_with(generator.clone());

    let summary = pipeline
        .run_conversation_pipeline(&format!(
            "User: summarize {}/page please\nAI: sure",
            server.uri()
        ))
        .await
        .unwrap();

    assert_eq!(summary.text, "- User wants the weather; AI said sunny.");
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("conversation history"));
    assert!(prompts[0].contains("no more than 200 words"));
}

#[tokio::test]
async fn blank_transcript_is_rejected() {
    let generator = ScriptedGenerator::replying("unused");
    let pipeline = pipeline_with(generator.clone());

    let err = pipeline.run_conversation_pipeline("   \n").await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn zero_word_limit_is_rejected_when_summarizing() {
    let server = serve_article().await;
    let generator = ScriptedGenerator::replying("unused");
    let pipeline = pipeline_with(generator.clone());

    let err = pipeline
        .run_scrape_pipeline(&format!("{}/article", server.uri()), true, 0)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(generator.calls(), 0);
}
