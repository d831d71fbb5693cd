use crate::model::Reading;

/// Local list of readings, kept in descending timestamp order.
///
/// Pushed readings are inserted at their sorted position, so the view stays
/// consistent even if the channel ever delivers out of order.
#[derive(Debug, Default)]
pub struct ReadingFeed {
    entries: Vec<Reading>,
}

impl ReadingFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list, e.g. after the initial load or a refresh
    pub fn replace(&mut self, mut readings: Vec<Reading>) {
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.entries = readings;
    }

    /// Inserts one pushed reading at its sorted position. A reading sharing
    /// a timestamp with existing entries lands in front of them.
    pub fn insert(&mut self, reading: Reading) {
        let at = self
            .entries
            .partition_point(|existing| existing.timestamp > reading.timestamp);
        self.entries.insert(at, reading);
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[Reading] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
