//! Draft validation.
//!
//! Every check is advisory: the validator never rejects a draft and never
//! mutates it. Problems come back as human-readable warnings in discovery
//! order so the editing layer can surface them verbatim and keep going.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::draft::ReceiptDraft;
use crate::rounding::cent_aligned;

/// Inspects a draft and returns one warning per problem found.
///
/// Checks run in a fixed order: the tax sign first, then each item in draft
/// order (negative price, empty payer list, unknown payer ids), then
/// duplicate person ids, then cent alignment of the money fields.
#[must_use]
pub fn validate(draft: &ReceiptDraft) -> Vec<String> {
    let mut warnings = Vec::new();

    if draft.tax_total < Decimal::ZERO {
        warnings.push("tax cannot be negative".to_string());
    }

    for item in &draft.items {
        if item.price < Decimal::ZERO {
            warnings.push(format!("item \"{}\" has a negative price", item.name));
        }
        if item.payers.is_empty() {
            warnings.push(format!("item \"{}\" has no payers", item.name));
        }
        for payer in &item.payers {
            if !draft.people.iter().any(|person| &person.id == payer) {
                warnings.push(format!(
                    "item \"{}\" references unknown payer \"{payer}\"",
                    item.name
                ));
            }
        }
    }

    let duplicates = duplicate_person_ids(draft);
    if !duplicates.is_empty() {
        warnings.push(format!("duplicate person ids: {}", duplicates.join(", ")));
    }

    for item in &draft.items {
        if !cent_aligned(item.price) {
            warnings.push(format!(
                "item \"{}\" has a price with more than 2 decimal places",
                item.name
            ));
        }
    }
    if !cent_aligned(draft.tax_total) {
        warnings.push("tax has more than 2 decimal places".to_string());
    }

    warnings
}

/// Ids appearing more than once in `people`, each listed once, in the order
/// the duplication is first seen.
fn duplicate_person_ids(draft: &ReceiptDraft) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(draft.people.len());
    let mut duplicated: Vec<String> = Vec::new();
    for person in &draft.people {
        if !seen.insert(person.id.as_str()) && !duplicated.iter().any(|id| id == &person.id) {
            duplicated.push(person.id.clone());
        }
    }
    duplicated
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::draft::{Item, Person};

    fn person(id: &str, name: &str) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
            handle: None,
        }
    }

    fn item(name: &str, price: &str, payers: &[&str]) -> Item {
        Item {
            id: format!("item-{}", name.to_lowercase()),
            name: name.to_string(),
            price: price.parse().unwrap(),
            category: None,
            payers: payers.iter().map(|payer| payer.to_string()).collect(),
            meta: BTreeMap::new(),
        }
    }

    fn draft(tax: &str, items: Vec<Item>, people: Vec<Person>) -> ReceiptDraft {
        let mut draft = ReceiptDraft::new("EUR");
        draft.tax_total = tax.parse().unwrap();
        draft.items = items;
        draft.people = people;
        draft
    }

    #[test]
    fn clean_draft_has_no_warnings() {
        let draft = draft(
            "0.50",
            vec![item("Milk", "1.20", &["p1"])],
            vec![person("p1", "Ada")],
        );
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn flags_negative_tax() {
        let draft = draft("-0.01", vec![], vec![]);
        assert_eq!(validate(&draft), vec!["tax cannot be negative".to_string()]);
    }

    #[test]
    fn flags_negative_price_and_missing_payers() {
        let draft = draft(
            "0.00",
            vec![item("Refund", "-3.00", &[]), item("Milk", "1.20", &["p1"])],
            vec![person("p1", "Ada")],
        );
        assert_eq!(
            validate(&draft),
            vec![
                "item \"Refund\" has a negative price".to_string(),
                "item \"Refund\" has no payers".to_string(),
            ]
        );
    }

    #[test]
    fn flags_unknown_payers_naming_both_sides() {
        let draft = draft(
            "0.00",
            vec![item("Milk", "1.20", &["p1", "ghost"])],
            vec![person("p1", "Ada")],
        );
        assert_eq!(
            validate(&draft),
            vec!["item \"Milk\" references unknown payer \"ghost\"".to_string()]
        );
    }

    #[test]
    fn flags_duplicate_person_ids_once() {
        let draft = draft(
            "0.00",
            vec![],
            vec![
                person("p1", "Ada"),
                person("p2", "Ben"),
                person("p1", "Ada again"),
                person("p2", "Ben again"),
                person("p1", "Ada once more"),
            ],
        );
        assert_eq!(
            validate(&draft),
            vec!["duplicate person ids: p1, p2".to_string()]
        );
    }

    #[test]
    fn flags_subcent_precision() {
        let mut draft = draft(
            "0.001",
            vec![item("Gas", "10.005", &["p1"])],
            vec![person("p1", "Ada")],
        );
        assert_eq!(
            validate(&draft),
            vec![
                "item \"Gas\" has a price with more than 2 decimal places".to_string(),
                "tax has more than 2 decimal places".to_string(),
            ]
        );

        draft.tax_total = "0.10".parse().unwrap();
        draft.items[0].price = "10.00".parse().unwrap();
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn warnings_keep_discovery_order() {
        let draft = draft(
            "-1.00",
            vec![
                item("Refund", "-3.00", &["ghost"]),
                item("Stray", "2.00", &[]),
            ],
            vec![person("p1", "Ada"), person("p1", "Twin")],
        );
        assert_eq!(
            validate(&draft),
            vec![
                "tax cannot be negative".to_string(),
                "item \"Refund\" has a negative price".to_string(),
                "item \"Refund\" references unknown payer \"ghost\"".to_string(),
                "item \"Stray\" has no payers".to_string(),
                "duplicate person ids: p1".to_string(),
            ]
        );
    }
}
