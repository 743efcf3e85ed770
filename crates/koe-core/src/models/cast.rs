use serde::{Deserialize, Serialize};

/// One character from a title's cast, with every actor credited for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastEdge {
    pub name: Option<String>,
    #[serde(default)]
    pub voice_actors: Vec<VoiceActorRole>,
}

/// A voice actor credited for a character in one dub language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceActorRole {
    pub actor_name: Option<String>,
    pub language: Option<String>,
}

impl CastEdge {
    pub fn new(name: impl Into<String>, voice_actors: Vec<VoiceActorRole>) -> Self {
        Self {
            name: Some(name.into()),
            voice_actors,
        }
    }

    /// Character name, treating an empty string as missing.
    pub fn character_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

impl VoiceActorRole {
    pub fn new(actor_name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            actor_name: Some(actor_name.into()),
            language: Some(language.into()),
        }
    }

    /// Actor name, treating an empty string as missing.
    pub fn actor(&self) -> Option<&str> {
        self.actor_name.as_deref().filter(|n| !n.is_empty())
    }
}
