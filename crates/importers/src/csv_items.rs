//! Item import from spreadsheet exports.
//!
//! The reader is header-driven: `name` and `price` are required columns,
//! `payers` and `category` optional, all matched case-insensitively. A row
//! that cannot be used is skipped with a message instead of failing the
//! import; only a missing required column or an unreadable source aborts.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use engine::{Item, Person};
use rust_decimal::Decimal;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{ImportError, ImportResult};

/// Items parsed from a CSV source, plus the rows that could not be used.
///
/// Skipped-row messages stay out of the calculation warnings: they describe
/// the source file, not the draft.
#[derive(Debug)]
pub struct CsvItems {
    pub items: Vec<Item>,
    /// One message per skipped row, numbered as in the file (header is row 1).
    pub skipped: Vec<String>,
}

/// Reads items from `name,price[,payers][,category]` CSV.
///
/// The `payers` cell holds comma- or semicolon-separated tokens, each
/// resolved against `people` by exact id first, then by normalized name.
/// Unresolved tokens are kept verbatim so the calculation can report them
/// as unknown payers instead of the importer silently dropping data.
///
/// Every imported item gets a fresh id and a `csv_row` meta entry pointing
/// back at its source row.
pub fn items_from_csv<R: Read>(source: R, people: &[Person]) -> ImportResult<CsvItems> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let name_col = require_column(&headers, "name")?;
    let price_col = require_column(&headers, "price")?;
    let payers_col = find_column(&headers, "payers");
    let category_col = find_column(&headers, "category");

    let names = NameIndex::new(people);

    let mut items = Vec::new();
    let mut skipped = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 2;

        let Some(name) = record.get(name_col).filter(|name| !name.is_empty()) else {
            skipped.push(format!("row {line}: empty name"));
            continue;
        };
        let Some(raw_price) = record.get(price_col).filter(|price| !price.is_empty()) else {
            skipped.push(format!("row {line}: empty price"));
            continue;
        };
        let price: Decimal = match raw_price.parse() {
            Ok(price) => price,
            Err(_) => {
                skipped.push(format!("row {line}: unparseable price \"{raw_price}\""));
                continue;
            }
        };
        if price < Decimal::ZERO {
            skipped.push(format!("row {line}: negative price {price}"));
            continue;
        }

        let payers = match payers_col.and_then(|col| record.get(col)) {
            Some(cell) => names.resolve(cell),
            None => Vec::new(),
        };
        let category = category_col
            .and_then(|col| record.get(col))
            .filter(|cell| !cell.is_empty())
            .map(ToString::to_string);

        let mut meta = BTreeMap::new();
        meta.insert("csv_row".to_string(), serde_json::Value::from(line));

        items.push(Item {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price,
            category,
            payers,
            meta,
        });
    }

    Ok(CsvItems { items, skipped })
}

fn require_column(headers: &StringRecord, wanted: &str) -> ImportResult<usize> {
    find_column(headers, wanted).ok_or_else(|| ImportError::MissingColumn(wanted.to_string()))
}

fn find_column(headers: &StringRecord, wanted: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(wanted))
}

/// Payer lookup over a people list: exact ids, then normalized names.
struct NameIndex<'a> {
    ids: HashSet<&'a str>,
    by_name: HashMap<String, &'a str>,
}

impl<'a> NameIndex<'a> {
    fn new(people: &'a [Person]) -> Self {
        let mut ids = HashSet::with_capacity(people.len());
        let mut by_name = HashMap::with_capacity(people.len());
        for person in people {
            ids.insert(person.id.as_str());
            // The first person to claim a normalized name keeps it.
            if let Some(key) = normalize_name(&person.name) {
                by_name.entry(key).or_insert(person.id.as_str());
            }
        }
        Self { ids, by_name }
    }

    fn resolve(&self, cell: &str) -> Vec<String> {
        let mut payers = Vec::new();
        for token in cell.split([',', ';']) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if self.ids.contains(token) {
                payers.push(token.to_string());
                continue;
            }
            let resolved = normalize_name(token).and_then(|key| self.by_name.get(key.as_str()));
            match resolved {
                Some(id) => payers.push((*id).to_string()),
                None => payers.push(token.to_string()),
            }
        }
        payers
    }
}

/// Folds a display name to a matching key: NFKD with combining marks
/// stripped, lowercased, separator runs collapsed to single spaces.
fn normalize_name(input: &str) -> Option<String> {
    let mut key = String::new();
    let mut pending_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            if pending_space && !key.is_empty() {
                key.push(' ');
            }
            pending_space = false;
            key.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    if key.is_empty() { None } else { Some(key) }
}
