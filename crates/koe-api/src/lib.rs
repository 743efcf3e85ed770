pub mod anilist;
pub mod traits;
