//! Boundary translators that turn external sources into drafts.
//!
//! Everything inside the core is tolerant; these functions are not. A source
//! that cannot be read at all fails with an [`ImportError`], while problems
//! scoped to a single CSV row are skipped and reported next to the parsed
//! items instead of aborting the import.

pub use csv_items::{CsvItems, items_from_csv};
pub use error::ImportError;
pub use json_draft::draft_from_json;

mod csv_items;
mod error;
mod json_draft;

type ImportResult<T> = Result<T, ImportError>;
