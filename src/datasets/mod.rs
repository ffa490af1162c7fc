/// CSV tables with named columns
pub mod table;

/// Raw text rows to tag
pub mod texts;

pub use table::Table;
