use crate::models::{AnimeRecord, Recommendation};

/// Narrative composition
///
/// Turns ranked records into the text the chat surface renders: the prompt
/// handed to the text-generation collaborator, and one markdown block per
/// recommendation.

pub const SYSTEM_PROMPT: &str = "You are an anime recommendation chatbot. \
Your task is to provide friendly, engaging responses about anime recommendations. \
Keep responses concise and natural. Include a brief explanation of why each anime \
might appeal to the user based on their query.";

/// Relevance scores above this threshold get the on-target icon
const RELEVANCE_HIGHLIGHT_THRESHOLD: f64 = 5.0;

/// Builds the text-generation prompt: system prompt, the user's query and a
/// compact summary of every ranked record
pub fn build_prompt(query: &str, recommendations: &[Recommendation]) -> String {
    let mut summary = String::new();
    for rec in recommendations {
        let kind = rec.anime.kind().unwrap_or("Unknown Type");
        summary.push_str(&format!(
            "- {} ({})\n  Genres: {}\n",
            rec.anime.title(),
            kind,
            rec.anime.genres().join(", ")
        ));
        if rec.anime.rating() > 0.0 {
            summary.push_str(&format!("  Rating: {}/10\n", rec.anime.rating()));
        }
    }

    format!(
        "{}\n\nUser Query: \"{}\"\n\nAvailable Recommendations:\n{}\n\
         Provide a friendly response explaining these recommendations:",
        SYSTEM_PROMPT, query, summary
    )
}

/// Formats one recommendation as a markdown block
///
/// Catalog records show their statistics; descriptive records show their
/// free-text description. The relevance line appears only when the cascade
/// actually scored the record.
pub fn format_block(rec: &Recommendation, media_url: Option<&str>) -> String {
    let title = rec.anime.title();
    let mut block = format!("### {}\n", title);

    if let Some(url) = media_url {
        block.push_str(&format!("![{}]({})\n\n", title, url));
    }

    match &rec.anime {
        AnimeRecord::Catalog(entry) => {
            block.push_str(&format!("📺 **Type:** {}\n", entry.kind));
            block.push_str(&format!("🎬 **Episodes:** {}\n", entry.episodes));
            block.push_str(&format!("⭐ **Rating:** {:.2}/10\n", entry.rating));
            block.push_str(&format!("👥 **Members:** {}\n", group_thousands(entry.members)));
        }
        AnimeRecord::Descriptive(entry) => {
            block.push_str(&format!("📝 {}\n", entry.description));
        }
    }

    block.push_str(&format!("🎭 **Genres:** {}\n", rec.anime.genres().join(", ")));

    if let Some(score) = rec.score {
        let icon = if score > RELEVANCE_HIGHLIGHT_THRESHOLD {
            "🎯"
        } else {
            "📍"
        };
        block.push_str(&format!("{} **Relevance:** {:.1}\n", icon, score));
    }

    block
}

/// Joins formatted blocks in ranked order; each block ends in a newline, so
/// single-newline joining yields a blank line between blocks
pub fn join_blocks(blocks: &[String]) -> String {
    blocks.join("\n")
}

/// Formats an integer with comma thousands separators
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, DescriptiveEntry, Episodes};

    fn catalog_rec(score: Option<f64>) -> Recommendation {
        Recommendation {
            anime: AnimeRecord::Catalog(CatalogEntry {
                id: "20".to_string(),
                title: "Naruto".to_string(),
                genres: vec!["Action".to_string(), "Comedy".to_string()],
                kind: "TV".to_string(),
                episodes: Episodes::Count("220".to_string()),
                rating: 7.81,
                members: 683297,
            }),
            score,
        }
    }

    fn descriptive_rec() -> Recommendation {
        Recommendation {
            anime: AnimeRecord::Descriptive(DescriptiveEntry {
                title: "Mushishi".to_string(),
                genres: vec!["Mystery".to_string()],
                description: "A wanderer studies strange lifeforms.".to_string(),
            }),
            score: Some(2.0),
        }
    }

    #[test]
    fn test_catalog_block_layout() {
        let block = format_block(&catalog_rec(Some(6.2)), None);
        assert_eq!(
            block,
            "### Naruto\n\
             📺 **Type:** TV\n\
             🎬 **Episodes:** 220\n\
             ⭐ **Rating:** 7.81/10\n\
             👥 **Members:** 683,297\n\
             🎭 **Genres:** Action, Comedy\n\
             🎯 **Relevance:** 6.2\n"
        );
    }

    #[test]
    fn test_descriptive_block_layout() {
        let block = format_block(&descriptive_rec(), None);
        assert!(block.starts_with("### Mushishi\n"));
        assert!(block.contains("📝 A wanderer studies strange lifeforms.\n"));
        assert!(!block.contains("**Type:**"));
        assert!(!block.contains("**Members:**"));
        assert!(block.contains("📍 **Relevance:** 2.0\n"));
    }

    #[test]
    fn test_media_line_when_url_present() {
        let block = format_block(&catalog_rec(None), Some("https://example.test/naruto.gif"));
        assert!(block.contains("![Naruto](https://example.test/naruto.gif)\n\n"));
    }

    #[test]
    fn test_relevance_line_omitted_without_score() {
        let block = format_block(&catalog_rec(None), None);
        assert!(!block.contains("**Relevance:**"));
    }

    #[test]
    fn test_relevance_icon_threshold() {
        assert!(format_block(&catalog_rec(Some(5.1)), None).contains("🎯"));
        assert!(format_block(&catalog_rec(Some(5.0)), None).contains("📍"));
    }

    #[test]
    fn test_join_blocks_blank_line_separation() {
        let blocks = vec!["### A\nline\n".to_string(), "### B\nline\n".to_string()];
        assert_eq!(join_blocks(&blocks), "### A\nline\n\n### B\nline\n");
    }

    #[test]
    fn test_prompt_contains_query_and_summary() {
        let prompt = build_prompt("popular action anime", &[catalog_rec(Some(6.0))]);
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("User Query: \"popular action anime\""));
        assert!(prompt.contains("- Naruto (TV)"));
        assert!(prompt.contains("  Genres: Action, Comedy"));
        assert!(prompt.contains("  Rating: 7.81/10"));
        assert!(prompt.ends_with("Provide a friendly response explaining these recommendations:"));
    }

    #[test]
    fn test_prompt_omits_rating_line_for_unrated() {
        let prompt = build_prompt("anything", &[descriptive_rec()]);
        assert!(prompt.contains("- Mushishi (Unknown Type)"));
        assert!(!prompt.contains("Rating:"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(683297), "683,297");
        assert_eq!(group_thousands(1_234_567_890), "1,234,567,890");
    }
}
