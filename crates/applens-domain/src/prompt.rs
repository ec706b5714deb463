//! Instructions sent to the generation service.

use applens_core::{AppAnalysis, SearchResult};

/// Instruction for finding apps that match `query`.
pub fn search_prompt(query: &str, max_results: usize) -> String {
    format!(
        "Search the web for real mobile apps (iOS App Store or Google Play) matching: \"{query}\".\n\
         Return at most {max_results} apps as a JSON array. Each element must be an object with \
         the string fields \"name\", \"developer\", \"description\" (one sentence) and \"rating\" \
         (average store rating out of 5 with one decimal, or \"N/A\").\n\
         Respond with the JSON array only, inside a ```json code block."
    )
}

/// Instruction for analysing one app's trustworthiness.
pub fn analysis_prompt(app: &SearchResult) -> String {
    format!(
        "Research the mobile app \"{name}\" by \"{developer}\" using web search.\n\
         Produce a trust and quality analysis as a single JSON object with these string fields:\n\
         - \"reviewSummary\": what users say in recent reviews, good and bad\n\
         - \"authenticity\": whether the listing, developer and reviews look genuine\n\
         - \"background\": who the developer is and their track record\n\
         - \"rating\": current average store rating out of 5 with one decimal\n\
         - \"downloads\": install count as shown by the store, e.g. \"10M+\" or \"500,000+\"\n\
         - \"lastUpdated\": date of the latest release, e.g. \"January 5, 2024\"\n\
         Use \"N/A\" for anything you cannot find. Respond with the JSON object only, inside a \
         ```json code block.",
        name = app.name,
        developer = app.developer,
    )
}

/// System instruction grounding a follow-up conversation in an analysis.
pub fn chat_system_instruction(app: &SearchResult, analysis: &AppAnalysis) -> String {
    let analysis_json = serde_json::to_string_pretty(analysis).unwrap_or_default();
    format!(
        "You are a helpful assistant answering questions about the mobile app \"{name}\" by \
         \"{developer}\". Base your answers on the analysis below; say so when it does not cover \
         the question. Keep answers short and plain.\n\nAnalysis:\n{analysis_json}",
        name = app.name,
        developer = app.developer,
    )
}
