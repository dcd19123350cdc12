use crate::record::CardRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered, read-only sequence of card records
///
/// Record order is significant: both matchers break score ties by
/// catalog position.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    records: Vec<CardRecord>,
}

impl Catalog {
    pub fn new(records: Vec<CardRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CardRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[CardRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<CardRecord> {
        self.records
    }

    pub fn to_values(&self) -> Vec<Value> {
        self.records.iter().map(CardRecord::to_value).collect()
    }
}

impl From<Vec<CardRecord>> for Catalog {
    fn from(records: Vec<CardRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<CardRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = CardRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_values_keeps_order() {
        let catalog = Catalog::new(vec![
            CardRecord::new("A").with_manufacturer("NVIDIA"),
            CardRecord::new("B"),
        ]);
        let values = catalog.to_values();

        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["manufacturer"], "NVIDIA");
        assert_eq!(values[1]["card"], "B");
    }

    #[test]
    fn test_order_preserved() {
        let catalog: Catalog = ["first", "second", "third"]
            .into_iter()
            .map(CardRecord::new)
            .collect();
        let names: Vec<_> = catalog.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
