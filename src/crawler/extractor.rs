//! Listing item extraction
//!
//! Turns one `listing-item standard` element into a `ListingRecord`.
//!
//! # Markup contract
//!
//! | Field | Source |
//! |-------|--------|
//! | brand | `data-webm-make` |
//! | model | `data-webm-model` |
//! | net_id | `data-webm-networkid` |
//! | price | `data-webm-price` |
//! | state | `data-webm-state` |
//! | seller_type | last text of the first `.seller-type` descendant |
//! | year | first token of the last text of `[data-webm-clickvalue="sv-title"]` |
//! | details | every `.key-detail-value`, keyed by normalized `data-type` |

use crate::crawler::markup::{MarkupNode, Query};
use crate::listing::ListingRecord;
use crate::ExtractionError;

/// Listing containers on a results page (showcase variants are not matched)
pub const LISTING_ITEM: Query = Query::exact_class("listing-item standard");

const SELLER_TYPE: Query = Query::class("seller-type");
const TITLE_LINK: Query = Query::attr_equals("data-webm-clickvalue", "sv-title");
const KEY_DETAIL: Query = Query::class("key-detail-value");

const ATTR_MAKE: &str = "data-webm-make";
const ATTR_MODEL: &str = "data-webm-model";
const ATTR_NETWORK_ID: &str = "data-webm-networkid";
const ATTR_PRICE: &str = "data-webm-price";
const ATTR_STATE: &str = "data-webm-state";
const ATTR_DETAIL_TYPE: &str = "data-type";

/// Extracts a listing record from one listing item node
///
/// # Returns
///
/// * `Ok(ListingRecord)` - All fixed fields were found
/// * `Err(ExtractionError)` - A fixed attribute or element is missing
///
/// Key details are optional: a detail without a `data-type` is ignored and a
/// detail without text is recorded with an empty value.
pub fn extract_item<N: MarkupNode>(item: &N) -> Result<ListingRecord, ExtractionError> {
    let brand = item.required_attr(ATTR_MAKE)?.to_string();
    let model = item.required_attr(ATTR_MODEL)?.to_string();
    let net_id = item.required_attr(ATTR_NETWORK_ID)?.to_string();
    let price = item.required_attr(ATTR_PRICE)?.to_string();
    let state = item.required_attr(ATTR_STATE)?.to_string();

    let seller_type = item
        .find_first(&SELLER_TYPE)
        .ok_or(ExtractionError::MissingElement {
            what: "seller type",
        })?
        .last_text()
        .ok_or(ExtractionError::EmptyText {
            what: "seller type",
        })?;

    let year = extract_year(item)?;

    let mut record = ListingRecord {
        brand,
        model,
        net_id,
        price,
        state,
        seller_type,
        year,
        ..ListingRecord::default()
    };

    for detail in item.find_all(&KEY_DETAIL) {
        let Some(raw_type) = detail.attr(ATTR_DETAIL_TYPE) else {
            tracing::debug!("Key detail without {} on listing {}", ATTR_DETAIL_TYPE, record.net_id);
            continue;
        };
        let key = normalize_detail_key(raw_type);
        let value = detail.last_text().unwrap_or_default();
        record.insert_detail(key, value);
    }

    Ok(record)
}

/// The year is the first whitespace-delimited token of the title link
fn extract_year<N: MarkupNode>(item: &N) -> Result<String, ExtractionError> {
    let title = item
        .find_first(&TITLE_LINK)
        .ok_or(ExtractionError::MissingElement { what: "title link" })?
        .last_text()
        .ok_or(ExtractionError::EmptyText { what: "title link" })?;

    title
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(ExtractionError::EmptyText { what: "title link" })
}

/// Lowercases a `data-type` value and replaces spaces with underscores
pub fn normalize_detail_key(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "_")
}
