use super::types::{Event, YearMonth};

/// Append-only sequence of imported events.
///
/// Duplicates are kept; every stored event counts toward reporting.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Empties the store.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Events dated inside `month`, across all sites.
    pub fn in_month(&self, month: YearMonth) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.is_in(month))
    }
}

impl Extend<Event> for EventStore {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(nmi: &str, date: &str) -> Option<Event> {
        Event::parse(nmi, date, "1", "1").ok()
    }

    fn store() -> EventStore {
        let mut store = EventStore::new();
        store.extend(
            [
                event("a", "2024-03-01"),
                event("b", "2024-03-15"),
                event("a", "2024-04-01"),
                event("a", "2024-03-01"),
            ]
            .into_iter()
            .flatten(),
        );
        store
    }

    #[test]
    fn keeps_duplicates_in_append_order() {
        let store = store();
        assert_eq!(store.len(), 4);
        let nmis: Vec<&str> = store.iter().map(|e| e.nmi.as_str()).collect();
        assert_eq!(nmis, ["a", "b", "a", "a"]);
    }

    #[test]
    fn month_filter_is_site_agnostic() {
        let store = store();
        let march = YearMonth::new(2024, 3);
        let count = march.map(|m| store.in_month(m).count());
        assert_eq!(count, Some(3));
    }

    #[test]
    fn clear_empties_store() {
        let mut store = store();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }
}
