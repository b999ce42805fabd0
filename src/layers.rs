// Keyed registry of drawable layer ids. The simulation maintains membership
// (tile maps and objects enter on creation, leave on death); main.rs walks it
// in z order to draw. No drawing happens here.

pub struct LayerEntry {
    pub id: String,
    pub z: i32,
}

pub struct LayerRegistry {
    entries: Vec<LayerEntry>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, id: impl Into<String>, z: i32) {
        let id = id.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.z = z;
        } else {
            self.entries.push(LayerEntry { id, z });
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // Ascending z, insertion order within a z band.
    pub fn ordered(&self) -> Vec<&LayerEntry> {
        let mut ordered: Vec<&LayerEntry> = self.entries.iter().collect();
        ordered.sort_by_key(|e| e.z);
        ordered
    }
}
