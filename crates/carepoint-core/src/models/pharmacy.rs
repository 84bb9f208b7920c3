//! Pharmacy inventory models.

use serde::{Deserialize, Serialize};

/// Stock status derived from on-hand quantity and threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Derive status: out at zero, low at or below the minimum, otherwise in stock.
    pub fn derive(current_stock: u32, minimum_stock: u32) -> Self {
        if current_stock == 0 {
            StockStatus::OutOfStock
        } else if current_stock <= minimum_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }

    /// Whether the item belongs on the alert list.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, StockStatus::InStock)
    }
}

/// On-hand stock of one medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PharmacyStock {
    pub medication_id: String,
    /// Medication name, matched against prescription lines
    pub name: String,
    pub current_stock: u32,
    /// Reorder threshold
    pub minimum_stock: u32,
    /// Predicted units needed next month
    pub demand_prediction: u32,
    /// Last restock date (YYYY-MM-DD)
    pub last_restocked: String,
    pub status: StockStatus,
}

impl PharmacyStock {
    pub fn new(medication_id: String, name: String, current_stock: u32, minimum_stock: u32) -> Self {
        Self {
            medication_id,
            name,
            current_stock,
            minimum_stock,
            demand_prediction: 0,
            last_restocked: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            status: StockStatus::derive(current_stock, minimum_stock),
        }
    }

    /// Recompute status from the quantity fields.
    pub fn refresh_status(&mut self) {
        self.status = StockStatus::derive(self.current_stock, self.minimum_stock);
    }
}

/// Point-in-time copy of the whole inventory, persisted as one object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PharmacySnapshot {
    pub stock: Vec<PharmacyStock>,
    /// Capture timestamp (RFC 3339)
    pub captured_at: String,
}

impl PharmacySnapshot {
    pub fn new(stock: Vec<PharmacyStock>) -> Self {
        Self {
            stock,
            captured_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derivation() {
        assert_eq!(StockStatus::derive(0, 30), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(0, 0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(20, 30), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(30, 30), StockStatus::LowStock);
        assert_eq!(StockStatus::derive(100, 30), StockStatus::InStock);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(StockStatus::OutOfStock.as_str(), "Out of Stock");
        assert_eq!(StockStatus::LowStock.as_str(), "Low Stock");
        assert_eq!(StockStatus::InStock.as_str(), "In Stock");
    }

    #[test]
    fn test_new_stock_derives_status() {
        let stock = PharmacyStock::new("2".into(), "Insulin (Rapid-acting)".into(), 25, 30);
        assert_eq!(stock.status, StockStatus::LowStock);
        assert_eq!(stock.last_restocked.len(), 10);
    }
}
