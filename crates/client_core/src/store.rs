use shared::domain::{Party, PartyId};

use crate::view::{render, DisplayNode};

/// In-memory party list in server order. Only mutated after a successful
/// server response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyStore {
    parties: Vec<Party>,
}

impl PartyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, items: Vec<Party>) {
        self.parties = items;
    }

    pub fn append(&mut self, item: Party) {
        self.parties.push(item);
    }

    pub fn remove(&mut self, id: &PartyId) -> bool {
        let before = self.parties.len();
        self.parties.retain(|party| &party.id != id);
        self.parties.len() != before
    }

    pub fn render(&self) -> Vec<DisplayNode> {
        render(&self.parties)
    }

    pub fn get(&self, id: &PartyId) -> Option<&Party> {
        self.parties.iter().find(|party| &party.id == id)
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
