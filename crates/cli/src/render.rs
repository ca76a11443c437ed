//! Terminal rendering for split results.

use std::collections::HashSet;

use engine::{CalculationResult, ReceiptDraft};

/// Per-person table plus the receipt summary lines.
///
/// The summary names the rounding method, and residual adjustments get one
/// line each so a reader can tell a reconciled total from a plainly rounded
/// one.
pub fn table(draft: &ReceiptDraft, result: &CalculationResult) -> String {
    let mut rows: Vec<[String; 4]> = vec![[
        "Person".to_string(),
        "Subtotal".to_string(),
        "Tax".to_string(),
        "Total".to_string(),
    ]];
    for breakdown in &result.per_person {
        rows.push([
            display_name(draft, &breakdown.person_id),
            breakdown.subtotal.to_string(),
            breakdown.tax_share.to_string(),
            breakdown.total.to_string(),
        ]);
    }

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            // Pad widths count characters, same as the formatter below.
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        out.push_str(&format!(
            "{:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}\n",
            row[0],
            row[1],
            row[2],
            row[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        ));
    }

    out.push('\n');
    out.push_str(&format!(
        "Receipt subtotal: {} {}\n",
        result.receipt_subtotal, draft.currency
    ));
    out.push_str(&format!("Tax: {} {}\n", result.receipt_tax, draft.currency));
    out.push_str(&format!(
        "Grand total: {} {}\n",
        result.receipt_grand, draft.currency
    ));
    out.push_str(&format!("Rounding: {}\n", result.rounding.method.as_str()));
    for adjustment in &result.rounding.residual_applied {
        out.push_str(&format!(
            "Rounding adjustment: {} {} for {}\n",
            adjustment.delta,
            draft.currency,
            display_name(draft, &adjustment.person_id)
        ));
    }

    out
}

/// Merges skipped-row, draft, and calculation warnings, dropping duplicates
/// while keeping first-seen order.
pub fn warnings_report(
    skipped: &[String],
    draft_warnings: &[String],
    calculation_warnings: &[String],
) -> Vec<String> {
    let mut seen = HashSet::new();
    skipped
        .iter()
        .chain(draft_warnings)
        .chain(calculation_warnings)
        .filter(|warning| seen.insert(warning.as_str()))
        .cloned()
        .collect()
}

fn display_name(draft: &ReceiptDraft, person_id: &str) -> String {
    match draft.people.iter().find(|person| person.id == person_id) {
        Some(person) => person.name.clone(),
        None => person_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use engine::{Item, Person, compute};
    use rust_decimal::Decimal;

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn person(id: &str, name: &str) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
            handle: None,
        }
    }

    fn item(name: &str, price: &str, payers: &[&str]) -> Item {
        Item {
            id: name.to_lowercase(),
            name: name.to_string(),
            price: dec(price),
            category: None,
            payers: payers.iter().map(|payer| payer.to_string()).collect(),
            meta: BTreeMap::new(),
        }
    }

    #[test]
    fn table_shows_people_and_the_receipt_summary() {
        let mut draft = ReceiptDraft::new("EUR");
        draft.tax_total = dec("0.36");
        draft.people = vec![
            person("kevin", "Kevin"),
            person("alice", "Alice"),
            person("bob", "Bob"),
        ];
        draft.items = vec![
            item("Oranges", "3.00", &["kevin", "alice", "bob"]),
            item("Apple", "1.50", &["kevin"]),
        ];
        let result = compute(&draft);

        let rendered = table(&draft, &result);

        assert!(rendered.starts_with("Person"));
        assert!(rendered.contains("Kevin"));
        assert!(rendered.contains("2.70"));
        assert!(rendered.contains("Receipt subtotal: 4.50 EUR"));
        assert!(rendered.contains("Grand total: 4.86 EUR"));
        assert!(rendered.contains("Rounding: half-up"));
        assert!(!rendered.contains("Rounding adjustment"));
    }

    #[test]
    fn column_widths_count_characters_not_bytes() {
        let mut draft = ReceiptDraft::new("EUR");
        draft.people = vec![person("a", "Joséphine")];
        draft.items = vec![item("Tea", "3.00", &["a"])];
        let result = compute(&draft);

        let rendered = table(&draft, &result);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Person     Subtotal   Tax  Total");
        assert_eq!(lines[1], "Joséphine      3.00  0.00   3.00");
    }

    #[test]
    fn table_notes_rounding_adjustments() {
        let mut draft = ReceiptDraft::new("EUR");
        draft.tax_total = dec("0.83");
        draft.people = vec![person("a", "Ada"), person("b", "Ben")];
        draft.items = vec![item("Coffee Beans", "10.00", &["a", "b"])];
        let result = compute(&draft);

        let rendered = table(&draft, &result);

        assert!(rendered.contains("Rounding adjustment: -0.01 EUR for Ada"));
    }

    #[test]
    fn report_merges_sources_and_drops_duplicates() {
        let skipped = vec!["row 2: empty price".to_string()];
        let from_validate = vec!["item \"Stray\" has no payers".to_string()];
        let from_compute = vec![
            "item \"Stray\" has no payers".to_string(),
            "cannot allocate tax when no items have payers".to_string(),
        ];

        let report = warnings_report(&skipped, &from_validate, &from_compute);

        assert_eq!(
            report,
            vec![
                "row 2: empty price".to_string(),
                "item \"Stray\" has no payers".to_string(),
                "cannot allocate tax when no items have payers".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_person_ids_render_verbatim() {
        let draft = ReceiptDraft::new("EUR");

        assert_eq!(display_name(&draft, "ghost"), "ghost");
    }
}
