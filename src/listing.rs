//! Listing record definitions
//!
//! A `ListingRecord` is one vehicle advertisement: seven fixed fields that every
//! listing carries, plus whatever key details the listing happens to show.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Names of the fixed fields every listing carries
pub const BASE_FIELDS: [&str; 7] = [
    "brand",
    "model",
    "net_id",
    "price",
    "state",
    "seller_type",
    "year",
];

/// One extracted vehicle listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingRecord {
    /// Vehicle make (`data-webm-make`)
    pub brand: String,

    /// Vehicle model (`data-webm-model`)
    pub model: String,

    /// Site-assigned listing identifier (`data-webm-networkid`)
    pub net_id: String,

    /// Listed price as shown by the site (`data-webm-price`)
    pub price: String,

    /// Region of the listing (`data-webm-state`)
    pub state: String,

    /// Dealer or private seller label
    pub seller_type: String,

    /// Model year, first token of the title link
    pub year: String,

    /// Variable key details (mileage, transmission, fuel type, ...)
    ///
    /// Keys are normalized `data-type` values. A detail never shadows a
    /// fixed field when the record is flattened.
    pub details: BTreeMap<String, String>,
}

impl ListingRecord {
    /// Looks up a field by name, fixed fields first, then key details
    pub fn get(&self, name: &str) -> Option<&str> {
        let base = match name {
            "brand" => Some(&self.brand),
            "model" => Some(&self.model),
            "net_id" => Some(&self.net_id),
            "price" => Some(&self.price),
            "state" => Some(&self.state),
            "seller_type" => Some(&self.seller_type),
            "year" => Some(&self.year),
            _ => None,
        };

        base.or_else(|| self.details.get(name)).map(String::as_str)
    }

    /// Inserts a key detail, replacing any earlier value under the same key
    pub fn insert_detail(&mut self, key: String, value: String) {
        self.details.insert(key, value);
    }

    /// Total number of fields: the fixed ones plus every distinct detail key
    ///
    /// Details named like a fixed field are counted once.
    pub fn field_count(&self) -> usize {
        let shadowed = self
            .details
            .keys()
            .filter(|k| BASE_FIELDS.contains(&k.as_str()))
            .count();
        BASE_FIELDS.len() + self.details.len() - shadowed
    }

    /// Fixed fields in `BASE_FIELDS` order, then details not shadowing them
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let base = BASE_FIELDS
            .iter()
            .filter_map(move |name| self.get(name).map(|value| (*name, value)));
        let details = self
            .details
            .iter()
            .filter(|(key, _)| !BASE_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value.as_str()));
        base.chain(details)
    }
}

/// Serialized as one flat object: fixed fields first, then key details
impl Serialize for ListingRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.field_count()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
