//! Draft import from the JSON shapes receipt-scanning tools emit.
//!
//! Field names vary per tool, so lookups go through alias lists (`price`,
//! `total`, `total_price` all mean the item price; the tax rides on
//! `taxTotal`, `tax_total`, or `tax`, the last either a bare number or an
//! object with an `amount`). Null values count as absent. Anything beyond
//! that tolerance is a structural error naming the offending JSON path.

use chrono::{DateTime, Utc};
use engine::{Item, Person, ReceiptDraft};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{ImportError, ImportResult};

/// Parses a whole draft from JSON text.
///
/// A draft without a `currency` field gets `default_currency`. People and
/// items without an `id` get a fresh one; a missing item or person name, or
/// a missing item price, is structural.
pub fn draft_from_json(source: &str, default_currency: &str) -> ImportResult<ReceiptDraft> {
    let root: Value = serde_json::from_str(source)?;
    let Value::Object(root) = root else {
        return Err(malformed("$", "expected a JSON object"));
    };

    let currency = match first_alias(&root, &["currency"]) {
        Some((_, value)) => string_value(value, "$.currency")?,
        None => default_currency.to_string(),
    };
    let mut draft = ReceiptDraft::new(&currency);

    if let Some((_, value)) = first_alias(&root, &["title"]) {
        draft.title = Some(string_value(value, "$.title")?);
    }
    if let Some((alias, value)) = first_alias(&root, &["storeName", "store_name"]) {
        draft.store_name = Some(string_value(value, &format!("$.{alias}"))?);
    }
    if let Some((alias, value)) = first_alias(&root, &["purchasedAt", "purchased_at"]) {
        draft.purchased_at = Some(timestamp(value, &format!("$.{alias}"))?);
    }
    draft.tax_total = tax_total(&root)?;

    if let Some((_, value)) = first_alias(&root, &["people"]) {
        let Value::Array(values) = value else {
            return Err(malformed("$.people", "expected an array"));
        };
        for (i, value) in values.iter().enumerate() {
            draft
                .people
                .push(person_from_json(value, &format!("$.people[{i}]"))?);
        }
    }
    if let Some((_, value)) = first_alias(&root, &["items"]) {
        let Value::Array(values) = value else {
            return Err(malformed("$.items", "expected an array"));
        };
        for (i, value) in values.iter().enumerate() {
            draft
                .items
                .push(item_from_json(value, &format!("$.items[{i}]"))?);
        }
    }

    Ok(draft)
}

fn person_from_json(value: &Value, context: &str) -> ImportResult<Person> {
    let Value::Object(person) = value else {
        return Err(malformed(context, "expected an object"));
    };

    let name = match first_alias(person, &["name"]) {
        Some((_, value)) => string_value(value, &format!("{context}.name"))?,
        None => return Err(ImportError::MissingField(format!("{context}.name"))),
    };
    let id = match first_alias(person, &["id"]) {
        Some((_, value)) => string_value(value, &format!("{context}.id"))?,
        None => Uuid::new_v4().to_string(),
    };
    let handle = match first_alias(person, &["handle"]) {
        Some((_, value)) => Some(string_value(value, &format!("{context}.handle"))?),
        None => None,
    };

    Ok(Person { id, name, handle })
}

fn item_from_json(value: &Value, context: &str) -> ImportResult<Item> {
    let Value::Object(item) = value else {
        return Err(malformed(context, "expected an object"));
    };

    let name = match first_alias(item, &["name"]) {
        Some((_, value)) => string_value(value, &format!("{context}.name"))?,
        None => return Err(ImportError::MissingField(format!("{context}.name"))),
    };
    let price = match first_alias(item, &["price", "total", "total_price"]) {
        Some((alias, value)) => decimal_value(value, &format!("{context}.{alias}"))?,
        None => return Err(ImportError::MissingField(format!("{context}.price"))),
    };
    let id = match first_alias(item, &["id"]) {
        Some((_, value)) => string_value(value, &format!("{context}.id"))?,
        None => Uuid::new_v4().to_string(),
    };
    let category = match first_alias(item, &["category"]) {
        Some((_, value)) => Some(string_value(value, &format!("{context}.category"))?),
        None => None,
    };
    let payers = match first_alias(item, &["payers"]) {
        Some((_, Value::Array(values))) => {
            let mut payers = Vec::with_capacity(values.len());
            for (i, value) in values.iter().enumerate() {
                payers.push(string_value(value, &format!("{context}.payers[{i}]"))?);
            }
            payers
        }
        Some((alias, _)) => {
            return Err(malformed(
                &format!("{context}.{alias}"),
                "expected an array of ids",
            ));
        }
        None => Vec::new(),
    };
    let meta = match item.get("meta") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => Default::default(),
    };

    Ok(Item {
        id,
        name,
        price,
        category,
        payers,
        meta,
    })
}

fn tax_total(root: &Map<String, Value>) -> ImportResult<Decimal> {
    let Some((alias, value)) = first_alias(root, &["taxTotal", "tax_total", "tax"]) else {
        return Ok(Decimal::ZERO);
    };
    let context = format!("$.{alias}");
    match value {
        Value::Object(tax) => match tax.get("amount").filter(|amount| !amount.is_null()) {
            Some(amount) => decimal_value(amount, &format!("{context}.amount")),
            None => Err(ImportError::MissingField(format!("{context}.amount"))),
        },
        other => decimal_value(other, &context),
    }
}

/// First alias present on the object with a non-null value.
fn first_alias<'v>(
    object: &'v Map<String, Value>,
    aliases: &[&'static str],
) -> Option<(&'static str, &'v Value)> {
    aliases
        .iter()
        .filter_map(|alias| object.get(*alias).map(|value| (*alias, value)))
        .find(|(_, value)| !value.is_null())
}

fn string_value(value: &Value, context: &str) -> ImportResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(malformed(context, "expected a string")),
    }
}

fn decimal_value(value: &Value, context: &str) -> ImportResult<Decimal> {
    match value {
        Value::Number(number) => number
            .to_string()
            .parse()
            .map_err(|_| malformed(context, "number does not fit a decimal")),
        Value::String(raw) => raw
            .trim()
            .parse()
            .map_err(|_| malformed(context, &format!("unparseable decimal \"{raw}\""))),
        _ => Err(malformed(context, "expected a number or a decimal string")),
    }
}

fn timestamp(value: &Value, context: &str) -> ImportResult<DateTime<Utc>> {
    let raw = string_value(value, context)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| malformed(context, &err.to_string()))
}

fn malformed(context: &str, message: &str) -> ImportError {
    ImportError::Malformed {
        context: context.to_string(),
        message: message.to_string(),
    }
}
