//! Draft receipt data model.
//!
//! The draft is the single mutable root owned by the hosting application; the
//! engine only ever reads it. Removing a person cascades through every item's
//! payer list so an edit never leaves a reference behind on purpose. Dangling
//! ids that arrive from outside are still tolerated and reported as warnings
//! rather than rejected.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Someone the receipt can be split against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique, stable identifier. Items reference people by this id.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

/// One line on the receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Pre-tax price of the whole line, expected to be >= 0.
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Ids of the people sharing this item, equal-weight. Duplicates carry no
    /// extra weight and dangling ids degrade to warnings downstream.
    #[serde(default)]
    pub payers: Vec<String>,
    /// Opaque bag for callers (import provenance, UI state). The engine never
    /// looks inside.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, serde_json::Value>,
}

/// A receipt being edited, before or after computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<DateTime<Utc>>,
    pub currency: String,
    /// Order-level tax, not itemized.
    #[serde(default)]
    pub tax_total: Decimal,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub people: Vec<Person>,
}

impl ReceiptDraft {
    /// Creates an empty draft in the given currency.
    #[must_use]
    pub fn new(currency: &str) -> Self {
        Self {
            title: None,
            store_name: None,
            purchased_at: None,
            currency: currency.to_string(),
            tax_total: Decimal::ZERO,
            items: Vec::new(),
            people: Vec::new(),
        }
    }

    /// Removes a person and strips their id from every item's payer list.
    ///
    /// Returns the removed person, or `None` when the id is unknown.
    pub fn remove_person(&mut self, id: &str) -> Option<Person> {
        let pos = self.people.iter().position(|person| person.id == id)?;
        let person = self.people.remove(pos);
        for item in &mut self.items {
            item.payers.retain(|payer| payer != id);
        }
        Some(person)
    }

    /// Removes an item by id and returns it.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let pos = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with_two_people() -> ReceiptDraft {
        let mut draft = ReceiptDraft::new("EUR");
        draft.people = vec![
            Person {
                id: "p1".to_string(),
                name: "Ada".to_string(),
                handle: None,
            },
            Person {
                id: "p2".to_string(),
                name: "Ben".to_string(),
                handle: Some("@ben".to_string()),
            },
        ];
        draft.items = vec![Item {
            id: "i1".to_string(),
            name: "Bread".to_string(),
            price: "2.40".parse().unwrap(),
            category: None,
            payers: vec!["p1".to_string(), "p2".to_string(), "p1".to_string()],
            meta: BTreeMap::new(),
        }];
        draft
    }

    #[test]
    fn remove_person_cascades_through_payers() {
        let mut draft = draft_with_two_people();
        let removed = draft.remove_person("p1").unwrap();

        assert_eq!(removed.name, "Ada");
        assert_eq!(draft.people.len(), 1);
        assert_eq!(draft.items[0].payers, vec!["p2".to_string()]);
    }

    #[test]
    fn remove_person_with_unknown_id_is_a_no_op() {
        let mut draft = draft_with_two_people();
        assert!(draft.remove_person("p9").is_none());
        assert_eq!(draft.people.len(), 2);
        assert_eq!(draft.items[0].payers.len(), 3);
    }

    #[test]
    fn remove_item_returns_it() {
        let mut draft = draft_with_two_people();
        let removed = draft.remove_item("i1").unwrap();

        assert_eq!(removed.name, "Bread");
        assert!(draft.items.is_empty());
        assert!(draft.remove_item("i1").is_none());
    }
}
