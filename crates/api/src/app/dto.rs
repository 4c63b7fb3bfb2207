use chrono::NaiveDate;
use serde::Deserialize;

use pairledger_core::{BoxItemId, UnitId};
use pairledger_inventory::{NewStockUnit, ProductInfo, UnitUpdate};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddUnitsRequest {
    pub units: Vec<NewStockUnit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitRequest {
    #[serde(default)]
    pub sku: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    #[serde(default)]
    pub box_id: Option<BoxItemId>,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
}

impl UpdateUnitRequest {
    pub fn into_update(self, id: UnitId) -> UnitUpdate {
        UnitUpdate {
            id,
            sku: self.sku,
            size: self.size,
            color: self.color,
            quantity: self.quantity,
            box_id: self.box_id,
            manufacture_date: self.manufacture_date,
        }
    }
}

/// Body of every batch import endpoint.
#[derive(Debug, Deserialize)]
pub struct ImportRequest<R> {
    pub rows: Vec<R>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl ProductRequest {
    pub fn into_product(self, sku: String) -> ProductInfo {
        ProductInfo {
            sku,
            name: self.name,
            category: self.category,
            sizes: self.sizes,
            colors: self.colors,
        }
    }
}
