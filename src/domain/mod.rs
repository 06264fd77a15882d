pub mod audio;
pub mod card;
pub mod note;
pub mod pos;
pub mod record;

pub use audio::AudioAsset;
pub use card::{FieldMap, FieldRoles, assemble, bind_audio};
pub use note::{NewNote, NoteField, NoteInfo};
pub use record::{
    Collection, Derivative, Idiom, NOT_AVAILABLE, OneOrMany, RecordKind, SimilarTerm, WordRecord,
};
