mod manager;

pub use manager::{EntryManager, EntryUpdate, NewManualEntry};
