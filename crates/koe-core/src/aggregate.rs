//! Shared voice-actor detection across a user's watched list.
//!
//! Recomputed from the stored credit strings on every call. Counts are per
//! display row, so an actor voicing two characters in one title counts
//! twice and is flagged as shared on its own.

use std::collections::HashMap;

use serde::Serialize;

use crate::credits::{self, CreditEntry};
use crate::models::{Language, WatchedTitle};

/// One character/actor line in a title's credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditRow {
    /// Empty for legacy credits that only named the actor.
    pub character: String,
    pub actor: String,
    pub shared: bool,
}

/// A watched title with its credits annotated for one language.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedTitle {
    #[serde(flatten)]
    pub title: WatchedTitle,
    #[serde(rename = "credit_rows")]
    pub rows: Vec<CreditRow>,
}

/// An actor credited more than once across the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedActor {
    pub actor: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedView {
    pub language: Language,
    pub titles: Vec<AnnotatedTitle>,
    /// Shared actors in the order they first appear in `titles`.
    pub shared_actors: Vec<SharedActor>,
}

/// Annotate every title's credits in `language` with a shared flag.
///
/// Titles keep the given order; rows keep decode order.
pub fn aggregate(titles: &[WatchedTitle], language: Language) -> AnnotatedView {
    let decoded: Vec<Vec<(String, String)>> = titles
        .iter()
        .map(|t| display_rows(credits::decode(t.credits.get(language))))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for (_, actor) in decoded.iter().flatten() {
        let count = counts.entry(actor.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(actor.as_str());
        }
        *count += 1;
    }

    let shared_actors = first_seen
        .iter()
        .filter_map(|actor| {
            let count = counts[actor];
            (count > 1).then(|| SharedActor {
                actor: actor.to_string(),
                count,
            })
        })
        .collect();

    let annotated = titles
        .iter()
        .zip(&decoded)
        .map(|(title, rows)| AnnotatedTitle {
            title: title.clone(),
            rows: rows
                .iter()
                .map(|(character, actor)| CreditRow {
                    character: character.clone(),
                    actor: actor.clone(),
                    shared: counts.get(actor.as_str()).copied().unwrap_or(0) > 1,
                })
                .collect(),
        })
        .collect();

    AnnotatedView {
        language,
        titles: annotated,
        shared_actors,
    }
}

/// Flatten decoded entries into one (character, actor) row per character.
fn display_rows(entries: Vec<CreditEntry>) -> Vec<(String, String)> {
    entries
        .into_iter()
        .flat_map(|entry| {
            if entry.characters.is_empty() {
                vec![(String::new(), entry.actor)]
            } else {
                let actor = entry.actor;
                entry
                    .characters
                    .into_iter()
                    .map(|character| (character, actor.clone()))
                    .collect()
            }
        })
        .collect()
}
