//! Voice-actor credit encoding.
//!
//! A title's cast is grouped per dub language into actor -> characters
//! entries and flattened into one string per language:
//!
//! ```text
//! Char A, Char B: Actor One|Char C: Actor Two
//! ```
//!
//! Actors appear once per language, in the order they were first seen in
//! the cast. Their characters keep first-seen order without duplicates.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{CastEdge, CreditRecord, Language};

const ENTRY_SEPARATOR: &str = "|";
const ACTOR_SEPARATOR: &str = ": ";
const CHARACTER_SEPARATOR: &str = ", ";

/// One decoded credit: an actor and the characters they voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditEntry {
    pub characters: Vec<String>,
    pub actor: String,
}

/// Insertion-ordered actor -> characters grouping.
#[derive(Debug, Default)]
struct ActorCredits {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl ActorCredits {
    fn credit(&mut self, actor: &str, character: &str) {
        let slot = match self.index.get(actor) {
            Some(&slot) => slot,
            None => {
                self.entries.push((actor.to_string(), Vec::new()));
                self.index.insert(actor.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        let characters = &mut self.entries[slot].1;
        if !characters.iter().any(|c| c == character) {
            characters.push(character.to_string());
        }
    }

    fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|(actor, characters)| {
                format!(
                    "{}{ACTOR_SEPARATOR}{actor}",
                    characters.join(CHARACTER_SEPARATOR)
                )
            })
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }
}

/// Group a title's cast into per-language credit strings.
///
/// Characters without a name, actors without a name, and roles in any
/// language other than Japanese or English contribute nothing.
pub fn encode(cast: &[CastEdge]) -> CreditRecord {
    let mut japanese = ActorCredits::default();
    let mut english = ActorCredits::default();

    for edge in cast {
        let Some(character) = edge.character_name() else {
            continue;
        };

        for role in &edge.voice_actors {
            let Some(actor) = role.actor() else {
                continue;
            };
            let language = role.language.as_deref().and_then(Language::from_label);
            match language {
                Some(Language::Japanese) => japanese.credit(actor, character),
                Some(Language::English) => english.credit(actor, character),
                None => {}
            }
        }
    }

    CreditRecord {
        japanese: japanese.serialize(),
        english: english.serialize(),
    }
}

/// Split one language's credit string back into entries.
///
/// Never fails: a segment without `": "` is read as a bare actor name with
/// no characters.
pub fn decode(record: &str) -> Vec<CreditEntry> {
    record
        .split(ENTRY_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once(ACTOR_SEPARATOR) {
            Some((characters, actor)) => CreditEntry {
                characters: characters
                    .split(CHARACTER_SEPARATOR)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect(),
                actor: actor.to_string(),
            },
            None => CreditEntry {
                characters: Vec::new(),
                actor: segment.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoiceActorRole;

    fn edge(character: &str, actor: &str, language: &str) -> CastEdge {
        CastEdge::new(character, vec![VoiceActorRole::new(actor, language)])
    }

    fn entry(characters: &[&str], actor: &str) -> CreditEntry {
        CreditEntry {
            characters: characters.iter().map(|c| c.to_string()).collect(),
            actor: actor.to_string(),
        }
    }

    #[test]
    fn test_merges_characters_per_actor() {
        let record = encode(&[edge("A", "Va1", "japanese"), edge("B", "Va1", "japanese")]);
        assert_eq!(record.japanese, "A, B: Va1");
        assert_eq!(record.english, "");
    }

    #[test]
    fn test_actor_order_is_first_seen() {
        let record = encode(&[
            edge("A", "Va2", "japanese"),
            edge("B", "Va1", "japanese"),
            edge("C", "Va2", "japanese"),
        ]);
        assert_eq!(record.japanese, "A, C: Va2|B: Va1");
    }

    #[test]
    fn test_languages_are_separated() {
        let cast = vec![CastEdge::new(
            "Edward Elric",
            vec![
                VoiceActorRole::new("Romi Park", "Japanese"),
                VoiceActorRole::new("Vic Mignogna", "ENGLISH"),
            ],
        )];
        let record = encode(&cast);
        assert_eq!(record.japanese, "Edward Elric: Romi Park");
        assert_eq!(record.english, "Edward Elric: Vic Mignogna");
    }

    #[test]
    fn test_duplicate_edges_are_idempotent() {
        let once = encode(&[edge("A", "Va1", "japanese")]);
        let twice = encode(&[edge("A", "Va1", "japanese"), edge("A", "Va1", "japanese")]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unrecognized_language_dropped() {
        let record = encode(&[
            edge("A", "Va1", "french"),
            edge("B", "Va2", ""),
            CastEdge::new(
                "C",
                vec![VoiceActorRole {
                    actor_name: Some("Va3".into()),
                    language: None,
                }],
            ),
        ]);
        assert!(record.is_empty());
    }

    #[test]
    fn test_missing_names_skipped() {
        let nameless_character = CastEdge {
            name: None,
            voice_actors: vec![VoiceActorRole::new("Va1", "japanese")],
        };
        let empty_character = CastEdge {
            name: Some(String::new()),
            voice_actors: vec![VoiceActorRole::new("Va1", "japanese")],
        };
        let nameless_actor = CastEdge::new(
            "B",
            vec![VoiceActorRole {
                actor_name: None,
                language: Some("japanese".into()),
            }],
        );
        let record = encode(&[nameless_character, empty_character, nameless_actor]);
        assert!(record.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode(&[]), CreditRecord::default());
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_decode_restores_grouping() {
        let cast = vec![
            edge("A", "Va1", "japanese"),
            edge("B", "Va2", "japanese"),
            edge("C", "Va1", "japanese"),
            edge("D", "Eng1", "english"),
        ];
        let record = encode(&cast);
        assert_eq!(
            decode(&record.japanese),
            vec![entry(&["A", "C"], "Va1"), entry(&["B"], "Va2")]
        );
        assert_eq!(decode(&record.english), vec![entry(&["D"], "Eng1")]);
    }

    #[test]
    fn test_decode_plain_actor_name() {
        assert_eq!(decode("Naruto Uzumaki"), vec![entry(&[], "Naruto Uzumaki")]);
    }

    #[test]
    fn test_decode_skips_empty_segments() {
        assert_eq!(
            decode("A: Va1||B: Va2|"),
            vec![entry(&["A"], "Va1"), entry(&["B"], "Va2")]
        );
    }

    #[test]
    fn test_decode_splits_on_first_separator() {
        assert_eq!(decode("A: Va: 1"), vec![entry(&["A"], "Va: 1")]);
    }
}
