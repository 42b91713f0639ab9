//! Persona cache.

use pchat_types::Persona;

/// Personas as last listed by the backend.
#[derive(Debug, Default)]
pub struct PersonasState {
    personas: Vec<Persona>,
    /// False until the first list arrives.
    pub loaded: bool,
}

impl PersonasState {
    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn get(&self, index: usize) -> Option<&Persona> {
        self.personas.get(index)
    }

    pub fn find(&self, id: u64) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn replace(&mut self, personas: Vec<Persona>) {
        self.personas = personas;
        self.loaded = true;
    }

    /// Inserts or replaces by id.
    pub fn upsert(&mut self, persona: Persona) {
        match self.personas.iter_mut().find(|p| p.id == persona.id) {
            Some(existing) => *existing = persona,
            None => self.personas.push(persona),
        }
    }

    pub fn remove(&mut self, id: u64) {
        self.personas.retain(|p| p.id != id);
    }
}
