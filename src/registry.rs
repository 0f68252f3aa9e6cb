// Bookkeeping for page-level listeners: live entries by id, and removed
// entries parked until a later dispatch can free them. A listener may remove
// itself from inside its own callback, so nothing is dropped on removal.
use fnv::FnvHashMap;

pub struct Registry<T> {
    next: u32,
    live: FnvHashMap<u32, T>,
    retired: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next: 0,
            live: FnvHashMap::default(),
            retired: Vec::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Reserve the id the next entry will be stored under.
    pub fn next_id(&mut self) -> u32 {
        self.next += 1;
        self.next
    }

    pub fn insert(&mut self, id: u32, entry: T) {
        self.live.insert(id, entry);
    }

    /// Move one entry to the retired list and hand it back for unregistering.
    /// Unknown or already retired ids are ignored.
    pub fn retire(&mut self, id: u32) -> Option<&T> {
        let entry = self.live.remove(&id)?;
        self.retired.push(entry);
        self.retired.last()
    }

    /// Retire every live entry, returning the ones retired by this call.
    pub fn retire_all(&mut self) -> &[T] {
        let from = self.retired.len();
        self.retired.extend(self.live.drain().map(|(_, entry)| entry));
        &self.retired[from..]
    }

    /// Free retired entries. Only call where none of them can be running.
    pub fn collect(&mut self) {
        self.retired.clear();
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn retired(&self) -> usize {
        self.retired.len()
    }
}
