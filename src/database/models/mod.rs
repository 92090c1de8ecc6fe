pub mod entry;
pub mod journal;

pub use entry::Entry;
pub use journal::Journal;
