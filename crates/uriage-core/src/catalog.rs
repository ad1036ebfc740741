//! # Product Catalog
//!
//! The list of products a daily entry can reference, with the price and tax
//! rate snapshotted into each saved line item.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductCatalog                                                         │
//! │  ├── id 1  中辛               ¥175   8%                                 │
//! │  ├── id 2  乳酸菌             ¥140   8%                                 │
//! │  ├── ...                                                                │
//! │  └── id 17 あいかのキムチ     ¥195   8%                                 │
//! │                                                                         │
//! │  add()    → id = max(id) + 1                                            │
//! │  update() → affects FUTURE entries only (records hold snapshots)        │
//! │  remove() → same                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Yen;
use crate::types::TaxRate;
use crate::validation::{validate_product_name, validate_unit_price};

/// Recorders offered by the entry form when nothing else is configured.
pub const DEFAULT_RECORDERS: [&str; 6] = ["中元", "平林", "坂口", "木島", "一ノ瀬", "河西"];

// =============================================================================
// Catalog Product
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: u32,
    pub name: String,
    pub unit_price: Yen,
    #[ts(as = "u8")]
    pub tax_rate: TaxRate,
}

impl CatalogProduct {
    fn new(id: u32, name: &str, price: i64, tax_rate: TaxRate) -> Self {
        Self {
            id,
            name: name.to_string(),
            unit_price: Yen::new(price),
            tax_rate,
        }
    }
}

/// Fields accepted when adding or editing a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub unit_price: Yen,
    #[ts(as = "u8")]
    pub tax_rate: TaxRate,
}

impl ProductDraft {
    fn validate(&self) -> CoreResult<()> {
        validate_product_name(&self.name)?;
        validate_unit_price(self.unit_price)?;
        Ok(())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Ordered product list. Order is display order and is preserved by edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    products: Vec<CatalogProduct>,
}

impl ProductCatalog {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    pub fn get(&self, id: u32) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The id the next added product will receive.
    pub fn next_id(&self) -> u32 {
        self.products.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Appends a product and returns it with its assigned id.
    pub fn add(&mut self, draft: ProductDraft) -> CoreResult<CatalogProduct> {
        draft.validate()?;

        let product = CatalogProduct {
            id: self.next_id(),
            name: draft.name.trim().to_string(),
            unit_price: draft.unit_price,
            tax_rate: draft.tax_rate,
        };
        self.products.push(product.clone());
        Ok(product)
    }

    /// Replaces name, price and rate of an existing product in place.
    pub fn update(&mut self, id: u32, draft: ProductDraft) -> CoreResult<CatalogProduct> {
        draft.validate()?;

        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;

        product.name = draft.name.trim().to_string();
        product.unit_price = draft.unit_price;
        product.tax_rate = draft.tax_rate;
        Ok(product.clone())
    }

    pub fn remove(&mut self, id: u32) -> CoreResult<CatalogProduct> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;
        Ok(self.products.remove(index))
    }
}

impl Default for ProductCatalog {
    /// The 17-product starter catalog.
    fn default() -> Self {
        use TaxRate::{Reduced, Standard};

        Self::new(vec![
            CatalogProduct::new(1, "中辛", 175, Reduced),
            CatalogProduct::new(2, "乳酸菌", 140, Reduced),
            CatalogProduct::new(3, "てしごと（ウス丸）", 215, Reduced),
            CatalogProduct::new(4, "日本", 155, Reduced),
            CatalogProduct::new(5, "匠", 355, Reduced),
            CatalogProduct::new(6, "てしごと本格", 415, Reduced),
            CatalogProduct::new(7, "手作り白菜200g", 315, Reduced),
            CatalogProduct::new(8, "本格", 405, Reduced),
            CatalogProduct::new(9, "一本漬け（日本）", 255, Reduced),
            CatalogProduct::new(10, "一本漬け（本格）", 255, Reduced),
            CatalogProduct::new(11, "一本漬け（手）", 355, Reduced),
            CatalogProduct::new(12, "ビニール（中辛）", 685, Standard),
            CatalogProduct::new(13, "ビニール500g", 360, Standard),
            CatalogProduct::new(14, "330g", 275, Standard),
            CatalogProduct::new(15, "CGC", 275, Standard),
            CatalogProduct::new(16, "日付", 131, Reduced),
            CatalogProduct::new(17, "あいかのキムチ", 195, Reduced),
        ])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
