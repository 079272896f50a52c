//! Pure interpretation of a directive list.
//!
//! Deciding what to do is kept apart from doing it so that the precedence
//! and merge rules can be checked without any collaborators.

use crate::directive::{Directive, DirectiveTag};

/// Separator used when folding general and realtime payloads together.
pub const MERGE_SEPARATOR: &str = " and ";

/// The single answer-producing path of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerPath {
    /// Answer through the realtime search handler.
    Realtime { query: String },
    /// Answer through the chat handler.
    General { query: String },
    /// Say goodbye and stop the loop.
    Exit,
    /// Nothing to answer (automation or image only, or unknown tags).
    Silent,
}

/// Everything the router will do for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    /// Hand the whole directive list to the automation handler once.
    pub automation: bool,
    /// Prompt of the image job to submit.
    pub image_prompt: Option<String>,
    /// Payloads of every general and realtime directive, joined.
    pub merged_query: String,
    pub answer: AnswerPath,
}

impl RoutePlan {
    /// Apply the precedence and merge rules to `directives`.
    ///
    /// - Automation: the first automation-tagged directive triggers one batch
    ///   dispatch; later ones are covered by the same batch.
    /// - Image: the last directive containing `"generate "` supplies the
    ///   prompt (earlier matches are overwritten).
    /// - Any `realtime` tag sends the merged general+realtime query to search.
    /// - Otherwise the first `general`, `realtime` or `exit` directive, in list
    ///   order, picks the answer path and the rest are dropped.
    pub fn from_directives(directives: &[Directive]) -> Self {
        let automation = directives.iter().any(Directive::is_automation);

        let mut image_prompt = None;
        for directive in directives {
            if let Some(prompt) = directive.image_prompt() {
                image_prompt = Some(prompt.to_owned());
            }
        }

        let merged_query = directives
            .iter()
            .filter(|d| d.has_tag(DirectiveTag::General) || d.has_tag(DirectiveTag::Realtime))
            .map(Directive::payload)
            .collect::<Vec<_>>()
            .join(MERGE_SEPARATOR);

        let has_realtime = directives.iter().any(|d| d.has_tag(DirectiveTag::Realtime));
        let answer = if has_realtime {
            AnswerPath::Realtime {
                query: merged_query.clone(),
            }
        } else {
            first_answer(directives)
        };

        Self {
            automation,
            image_prompt,
            merged_query,
            answer,
        }
    }
}

fn first_answer(directives: &[Directive]) -> AnswerPath {
    for directive in directives {
        if directive.has_tag(DirectiveTag::General) {
            return AnswerPath::General {
                query: directive.payload(),
            };
        }
        if directive.has_tag(DirectiveTag::Realtime) {
            return AnswerPath::Realtime {
                query: directive.payload(),
            };
        }
        if directive.has_tag(DirectiveTag::Exit) {
            return AnswerPath::Exit;
        }
    }
    AnswerPath::Silent
}
