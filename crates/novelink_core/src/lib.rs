pub mod domain;
pub mod paginate;
pub mod ports;

pub use domain::{
    strip_markup, AuthSession, AuthorSnapshot, ContentFragment, Draft, NavigationIntent, NewNovel,
    Novel, NovelPatch, NovelStats, ReadingPreferences, Utterance,
};
pub use paginate::{split_fragments, Paginator, PARAGRAPHS_PER_PAGE};
pub use ports::{ContentGateway, KeyValueStore, PortError, PortResult, SpeechEvent, SpeechSynthesizer};
