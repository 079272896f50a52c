//! Rule-based stand-in for the trained intent model.

use crate::directive::{Directive, DirectiveTag};
use crate::handlers::IntentClassifier;
use async_trait::async_trait;

/// Whole-query phrases that end the session.
const FAREWELLS: [&str; 5] = ["bye", "goodbye", "good bye", "quit", "see you"];

/// Splits a query on `,` and tags each part.
///
/// Parts that already start with a known tag (`"open chrome"`,
/// `"realtime weather"`) pass through lowercased; anything else becomes
/// `general <part>`. A bare farewell maps to `exit`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixClassifier;

impl PrefixClassifier {
    pub fn classify_line(query: &str) -> Vec<Directive> {
        query
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::classify_part)
            .collect()
    }

    fn classify_part(part: &str) -> Directive {
        let lowered = part.to_lowercase();
        let bare = lowered.trim_end_matches(['.', '!', '?']);
        if FAREWELLS.contains(&bare) {
            return Directive::new(DirectiveTag::Exit.prefix());
        }
        let candidate = Directive::new(lowered.clone());
        if candidate.tag().is_some() {
            candidate
        } else {
            Directive::new(format!("{} {part}", DirectiveTag::General.prefix()))
        }
    }
}

#[async_trait]
impl IntentClassifier for PrefixClassifier {
    async fn classify(&self, query: &str) -> anyhow::Result<Vec<Directive>> {
        Ok(Self::classify_line(query))
    }
}
