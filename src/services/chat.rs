use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::state::AppState;
use crate::error::{AppError, AppResult};
use crate::models::Recommendation;
use crate::services::{composer, selector};

/// The send pipeline
///
/// One user message runs: selection over the whole catalog, then the
/// narrative call and a concurrent media fetch batch, then block formatting.
/// Collaborator failures degrade the reply (no narrative, no media line);
/// only the selection itself decides between recommendations and the
/// no-results message. Any unexpected error is caught at the top, recorded
/// with context, and surfaced as a single apologetic message.

pub const WELCOME_MESSAGE: &str = "Konnichiwa! 👋 I'm your anime recommendation assistant. \
I can help you find anime based on:\n\n\
🎭 Genres (e.g., 'action', 'romance')\n\
📺 Type (e.g., 'TV series', 'movie')\n\
⭐ Rating (e.g., 'highly rated')\n\
👥 Popularity (e.g., 'popular')\n\n\
What kind of anime are you looking for?";

pub const LOAD_ERROR_MESSAGE: &str = "Gomen nasai! 😔 There was an error loading the anime \
database. Please try refreshing the page.";

pub const GENERIC_ERROR_MESSAGE: &str =
    "Sumimasen! 😓 Something went wrong. Please try again!";

pub fn no_results_message(query: &str) -> String {
    format!(
        "Gomen ne~ 😅 I couldn't find any anime matching \"{}\". Try:\n\
         • Using different keywords or genres\n\
         • Specifying if you want a TV series or movie\n\
         • Describing the type of story you're interested in",
        query
    )
}

/// One bot message; recommendation messages carry the formatted blocks
#[derive(Debug, Clone, Serialize)]
pub struct BotMessage {
    pub text: String,
    pub recommendation: bool,
}

impl BotMessage {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            recommendation: false,
        }
    }
}

/// The ordered bot messages produced for one user message
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub messages: Vec<BotMessage>,
}

impl ChatReply {
    fn single(text: impl Into<String>) -> Self {
        Self {
            messages: vec![BotMessage::plain(text)],
        }
    }
}

/// Runs the pipeline for one user message; always returns a well-formed reply
pub async fn handle_message(state: &AppState, query: &str) -> ChatReply {
    match run_pipeline(state, query).await {
        Ok(reply) => reply,
        Err(e) => {
            state
                .record_error(&e, json!({ "query": query, "action": "handle_message" }))
                .await;
            ChatReply::single(GENERIC_ERROR_MESSAGE)
        }
    }
}

async fn run_pipeline(state: &AppState, query: &str) -> AppResult<ChatReply> {
    let Some(catalog) = state.catalog.as_ref() else {
        return Ok(ChatReply::single(LOAD_ERROR_MESSAGE));
    };

    let recommendations = selector::select(catalog, query);

    tracing::info!(
        query = %query,
        results = recommendations.len(),
        "Recommendations selected"
    );

    if recommendations.is_empty() {
        return Ok(ChatReply::single(no_results_message(query)));
    }

    let narrative = generate_narrative(state, query, &recommendations).await;
    let media_urls = fetch_media_batch(state, &recommendations).await;

    let blocks: Vec<String> = recommendations
        .iter()
        .zip(&media_urls)
        .map(|(rec, url)| composer::format_block(rec, url.as_deref()))
        .collect();

    let mut messages = Vec::new();
    if let Some(text) = narrative {
        messages.push(BotMessage::plain(text));
    }
    messages.push(BotMessage {
        text: composer::join_blocks(&blocks),
        recommendation: true,
    });

    Ok(ChatReply { messages })
}

/// Asks the text-generation collaborator for the narrative preamble
///
/// Failure is swallowed: the ranked list still goes out, only the preamble
/// is omitted.
async fn generate_narrative(
    state: &AppState,
    query: &str,
    recommendations: &[Recommendation],
) -> Option<String> {
    let generator = state.generator.as_ref()?;
    let prompt = composer::build_prompt(query, recommendations);

    match generator.generate(&prompt).await {
        Ok(text) => Some(text.trim().to_string()),
        Err(e) => {
            state
                .record_error(&e, json!({ "query": query, "action": "generate_narrative" }))
                .await;
            None
        }
    }
}

enum MediaFetch {
    Cached(String),
    Spawned(String, JoinHandle<AppResult<Option<String>>>),
}

/// Fetches one media URL per recommendation, concurrently
///
/// Cache hits skip the network; successes are cached by title for the rest
/// of the session; each failure is logged and degrades only its own record.
async fn fetch_media_batch(
    state: &AppState,
    recommendations: &[Recommendation],
) -> Vec<Option<String>> {
    let Some(searcher) = state.media_searcher.as_ref() else {
        return vec![None; recommendations.len()];
    };

    let mut fetches = Vec::with_capacity(recommendations.len());
    {
        let cache = state.media_cache.read().await;
        for rec in recommendations {
            let title = rec.anime.title().to_string();
            if let Some(url) = cache.get(&title) {
                fetches.push(MediaFetch::Cached(url.clone()));
                continue;
            }

            let searcher = Arc::clone(searcher);
            let media_query = format!("{} anime", title);
            let task = tokio::spawn(async move { searcher.search(&media_query).await });
            fetches.push(MediaFetch::Spawned(title, task));
        }
    }

    let mut urls = Vec::with_capacity(fetches.len());
    for fetch in fetches {
        match fetch {
            MediaFetch::Cached(url) => urls.push(Some(url)),
            MediaFetch::Spawned(title, task) => match task.await {
                Ok(Ok(Some(url))) => {
                    state
                        .media_cache
                        .write()
                        .await
                        .insert(title, url.clone());
                    urls.push(Some(url));
                }
                Ok(Ok(None)) => urls.push(None),
                Ok(Err(e)) => {
                    state
                        .record_error(&e, json!({ "title": title, "action": "fetch_media" }))
                        .await;
                    urls.push(None);
                }
                Err(e) => {
                    let error = AppError::Internal(e.to_string());
                    state
                        .record_error(&error, json!({ "title": title, "action": "fetch_media" }))
                        .await;
                    urls.push(None);
                }
            },
        }
    }

    urls
}
