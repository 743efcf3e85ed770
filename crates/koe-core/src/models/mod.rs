mod cast;
mod catalog;
mod credit;
mod user;
mod watched;

pub use cast::{CastEdge, VoiceActorRole};
pub use catalog::CatalogAnime;
pub use credit::{CreditRecord, Language};
pub use user::{Session, User};
pub use watched::WatchedTitle;
