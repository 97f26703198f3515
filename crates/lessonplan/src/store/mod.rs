//! Storage for named JSON collections.
//!
//! Each collection is a flat list of JSON records that is always read and
//! written as a whole.

mod file;
mod locks;
mod memory;

pub use file::JsonFileStore;
pub use locks::CollectionLocks;
pub use memory::MemoryStore;

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The collections the backend persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Syllabus,
    SemesterTimetable,
    SemesterDetails,
    ChapterDetails,
    LessonTimetable,
}

impl Collection {
    /// File name of the collection inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Syllabus => "syllabus_details.json",
            Collection::SemesterTimetable => "semester_timetable.json",
            Collection::SemesterDetails => "semester_details.json",
            Collection::ChapterDetails => "chapter_details.json",
            Collection::LessonTimetable => "lesson_timetable.json",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name().trim_end_matches(".json"))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {collection}: {source}")]
    Io {
        collection: Collection,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {collection}: {source}")]
    Json {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
}

/// Load/replace access to JSON collections.
///
/// Calls are synchronous and non-transactional; there is no consistency
/// across collections.
pub trait DocumentStore: Send + Sync {
    /// Returns every record of the collection, or an empty list if it has
    /// never been written.
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    /// Replaces the whole collection.
    fn save(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError>;

    /// Appends one record to the collection.
    fn append(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        let mut records = self.load(collection)?;
        records.push(record);
        self.save(collection, &records)
    }
}
