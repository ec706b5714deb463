//! End-to-end flows through the domain facade with a scripted backend.

use std::sync::Arc;

use anyhow::Result;
use applens_config::AppLensConfig;
use applens_domain::{ChatMessage, DomainError, DomainServices, LlmError};
use applens_llm::{GenerationResponse, GroundingChunk, GroundingMetadata, MockBackend, Role};

const SEARCH_REPLY: &str = r#"Sure! Here are some options:
```json
[
  {"name": "Habitica", "developer": "HabitRPG", "description": "Gamified habits.", "rating": "4.4 out of 5"},
  {"name": "Streaks", "developer": "Crunchy Bagel", "description": "Daily streaks.", "rating": 4.8},
  {"name": "Loop", "developer": "Iswitch", "description": "Open source tracker.", "rating": "N/A"},
  {"name": "Done", "developer": "Reset Apps", "description": "Goal tracker.", "rating": "7"},
  {"name": "Productive", "developer": "Apalon", "description": "Routines.", "rating": "4.5"}
]
```
Let me know if you want more."#;

const ANALYSIS_REPLY: &str = r#"{"reviewSummary": "Users praise the RPG twist.",
"authenticity": "", "background": "Run by HabitRPG Inc.", "rating": "Rated 4.4/5",
"downloads": "10,000,000+ installs", "lastUpdated": "March 3, 2024"}"#;

fn services(mock: &Arc<MockBackend>) -> DomainServices {
    DomainServices::new(mock.clone(), &AppLensConfig::new())
}

#[tokio::test]
async fn test_search_then_analyze_then_chat() -> Result<()> {
    let analysis_response =
        GenerationResponse::text(ANALYSIS_REPLY).with_grounding(GroundingMetadata::new(vec![
            GroundingChunk::web("https://play.google.com/store/apps/details?id=habitica"),
            GroundingChunk::web("https://habitica.com"),
            GroundingChunk::web("https://habitica.com"),
        ]));
    let mock = Arc::new(MockBackend::new(vec![
        GenerationResponse::text(SEARCH_REPLY),
        analysis_response,
        GenerationResponse::text("Yes, it has a free tier."),
    ]));
    let services = services(&mock);

    let apps = services.search().search("habit tracker").await?;
    assert_eq!(apps.len(), 4);
    let ratings: Vec<&str> = apps.iter().map(|a| a.rating.as_str()).collect();
    assert_eq!(ratings, vec!["4.4", "4.8", "N/A", "N/A"]);

    let analysis = services.analysis().analyze(&apps[0]).await?;
    assert_eq!(analysis.rating, "4.4");
    assert_eq!(analysis.downloads, "10,000,000+");
    assert_eq!(analysis.last_updated.as_deref(), Some("March 3, 2024"));
    assert!(!analysis.authenticity.is_empty());
    assert_eq!(analysis.grounding_urls.len(), 2);

    let history = vec![
        ChatMessage::user("Is it ad-supported?"),
        ChatMessage::model("No ads in the main app."),
    ];
    let reply = services
        .chat()
        .reply(&apps[0], &analysis, &history, "Is it free?")
        .await?;
    assert_eq!(reply, "Yes, it has a free tier.");

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].uses_web_search());
    assert!(requests[1].uses_web_search());
    assert!(!requests[2].uses_web_search());

    let chat_request = &requests[2];
    assert_eq!(chat_request.prompt, "Is it free?");
    assert_eq!(chat_request.history.len(), 2);
    assert_eq!(chat_request.history[0].role, Role::User);
    assert_eq!(chat_request.history[1].role, Role::Model);
    let system = chat_request.system.as_deref().unwrap_or_default();
    assert!(system.contains("Users praise the RPG twist."));
    Ok(())
}

#[tokio::test]
async fn test_blank_query_never_reaches_backend() -> Result<()> {
    let mock = Arc::new(MockBackend::new(vec![]));
    let err = services(&mock).search().search("").await.unwrap_err();

    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_backend_failure_passes_through() -> Result<()> {
    let mock = Arc::new(MockBackend::with_outcomes(vec![Err(LlmError::Backend(
        "quota exhausted".to_string(),
    ))]));
    let err = services(&mock).search().search("notes").await.unwrap_err();

    assert_eq!(err.to_string(), "Backend error: quota exhausted");
    Ok(())
}

#[tokio::test]
async fn test_analysis_without_json_fails() -> Result<()> {
    let mock = Arc::new(MockBackend::with_text("I couldn't find reliable information."));
    let app = applens_domain::SearchResult {
        name: "Ghost".to_string(),
        developer: "Nobody".to_string(),
        description: String::new(),
        rating: "N/A".to_string(),
    };

    let err = services(&mock).analysis().analyze(&app).await.unwrap_err();
    assert_eq!(err.to_string(), applens_domain::ANALYSIS_PARSE_MESSAGE);
    Ok(())
}

#[tokio::test]
async fn test_long_conversation_is_windowed() -> Result<()> {
    let mock = Arc::new(MockBackend::with_text("Sure."));
    let mut config = AppLensConfig::new();
    config.chat = Some(applens_config::ChatConfig {
        context_budget: 5_000,
        ..Default::default()
    });
    let services = DomainServices::new(mock.clone(), &config);

    let history: Vec<ChatMessage> = (0..40)
        .map(|i| {
            let text = format!("{i:02}{}", "x".repeat(498));
            if i % 2 == 0 {
                ChatMessage::user(text)
            } else {
                ChatMessage::model(text)
            }
        })
        .collect();
    let app = applens_domain::SearchResult {
        name: "Notes".to_string(),
        developer: "Acme".to_string(),
        description: String::new(),
        rating: "4.0".to_string(),
    };

    services
        .chat()
        .reply(&app, &Default::default(), &history, "and now?")
        .await?;

    let sent = &mock.requests()[0].history;
    assert!(!sent.is_empty());
    assert!(sent.len() < history.len());
    assert!(sent.last().is_some_and(|t| t.text.starts_with("39")));
    let firsts: Vec<&str> = sent.iter().map(|t| &t.text[..2]).collect();
    let mut sorted = firsts.clone();
    sorted.sort_unstable();
    assert_eq!(firsts, sorted);
    Ok(())
}
