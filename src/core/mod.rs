pub mod execution;
pub mod job;
pub mod launcher;
pub mod listener;
pub mod processor;
pub mod repository;
pub mod step;
pub mod writer;

pub use crate::domain::model::{NewPerson, Person, PersonInput};
pub use crate::domain::ports::{ItemProcessor, ItemReader, ItemWriter, PersonStore};
pub use crate::utils::error::Result;
