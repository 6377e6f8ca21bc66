use crate::domain::model::{NewPerson, PersonInput};
use crate::domain::ports::ItemProcessor;
use crate::utils::error::Result;

/// firstName + " " + lastName
#[derive(Debug, Clone, Copy, Default)]
pub struct NameConcatenationProcessor;

impl ItemProcessor for NameConcatenationProcessor {
    type Input = PersonInput;
    type Output = NewPerson;

    fn process(&self, item: PersonInput) -> Result<Option<NewPerson>> {
        Ok(Some(NewPerson {
            name: item.full_name(),
        }))
    }
}
