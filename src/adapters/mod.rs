// Adapters layer: concrete implementations for the input file and the relational store.

pub mod csv_reader;
pub mod sqlite_store;

pub use csv_reader::DelimitedFileReader;
pub use sqlite_store::SqlitePersonStore;
