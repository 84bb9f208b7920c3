//! Pharmacy inventory and demand prediction.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::{PharmacySnapshot, PharmacyStock, Prescription, StockStatus};

/// Prescriptions older than this do not count toward demand.
pub const DEMAND_WINDOW_DAYS: i64 = 30;

/// Predicted demand is recent usage scaled by this factor.
pub const DEMAND_GROWTH: f64 = 1.2;

#[derive(Error, Debug, PartialEq)]
pub enum PharmacyError {
    #[error("Unknown medication: {0}")]
    UnknownMedication(String),
}

/// In-memory stock list plus the prescriptions it has seen.
pub struct PharmacyManager {
    stock: Vec<PharmacyStock>,
    history: Vec<Prescription>,
}

impl Default for PharmacyManager {
    fn default() -> Self {
        Self::new(default_stock())
    }
}

impl PharmacyManager {
    pub fn new(stock: Vec<PharmacyStock>) -> Self {
        Self {
            stock,
            history: Vec::new(),
        }
    }

    /// Resume from a persisted snapshot.
    pub fn from_snapshot(snapshot: PharmacySnapshot) -> Self {
        Self::new(snapshot.stock)
    }

    pub fn stock(&self) -> &[PharmacyStock] {
        &self.stock
    }

    /// Set the on-hand quantity of one item and stamp today as its restock date.
    pub fn update_stock(
        &mut self,
        medication_id: &str,
        quantity: u32,
    ) -> Result<&PharmacyStock, PharmacyError> {
        let index = self
            .stock
            .iter()
            .position(|s| s.medication_id == medication_id)
            .ok_or_else(|| PharmacyError::UnknownMedication(medication_id.to_string()))?;

        let item = &mut self.stock[index];
        item.current_stock = quantity;
        item.last_restocked = Utc::now().format("%Y-%m-%d").to_string();
        tracing::info!(medication = %item.name, quantity, "Stock updated");

        self.analyze_demand();
        Ok(&self.stock[index])
    }

    /// Recompute predicted demand and status for every item.
    pub fn analyze_demand(&mut self) -> &[PharmacyStock] {
        self.analyze_demand_at(Utc::now())
    }

    /// [`analyze_demand`](Self::analyze_demand) against a fixed clock.
    pub fn analyze_demand_at(&mut self, now: DateTime<Utc>) -> &[PharmacyStock] {
        let cutoff = now - Duration::days(DEMAND_WINDOW_DAYS);
        let recent: Vec<&Prescription> = self
            .history
            .iter()
            .filter(|rx| {
                DateTime::parse_from_rfc3339(&rx.date_issued)
                    .map(|issued| issued.with_timezone(&Utc) >= cutoff)
                    .unwrap_or(false)
            })
            .collect();

        for item in &mut self.stock {
            let used: u32 = recent.iter().map(|rx| rx.quantity_of(&item.name)).sum();
            item.demand_prediction = (used as f64 * DEMAND_GROWTH).ceil() as u32;
            item.refresh_status();
        }
        &self.stock
    }

    /// Items that are low or out.
    pub fn critical_alerts(&self) -> Vec<&PharmacyStock> {
        self.stock
            .iter()
            .filter(|s| s.status.needs_attention())
            .collect()
    }

    pub fn add_prescription_to_history(&mut self, prescription: Prescription) {
        self.history.push(prescription);
    }

    /// Copy of the current inventory for persistence.
    pub fn snapshot(&self) -> PharmacySnapshot {
        PharmacySnapshot::new(self.stock.clone())
    }
}

/// Starting inventory.
pub fn default_stock() -> Vec<PharmacyStock> {
    let seed = [
        ("1", "Paracetamol 500mg", 150, 50, 200, "2024-12-01"),
        ("2", "Insulin (Rapid-acting)", 25, 30, 45, "2024-12-05"),
        ("3", "Antibiotics (Amoxicillin)", 80, 40, 120, "2024-11-28"),
    ];
    seed.into_iter()
        .map(|(id, name, current, minimum, demand, restocked)| PharmacyStock {
            medication_id: id.into(),
            name: name.into(),
            current_stock: current,
            minimum_stock: minimum,
            demand_prediction: demand,
            last_restocked: restocked.into(),
            status: StockStatus::derive(current, minimum),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Medication;

    fn prescription(name: &str, quantity: u32, issued: DateTime<Utc>) -> Prescription {
        let mut rx = Prescription::new(
            "p-1".into(),
            "Fever".into(),
            String::new(),
            vec![Medication::new(name.into(), quantity)],
        );
        rx.date_issued = issued.to_rfc3339();
        rx
    }

    #[test]
    fn test_seed_statuses() {
        let manager = PharmacyManager::default();
        let statuses: Vec<_> = manager.stock().iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![StockStatus::InStock, StockStatus::LowStock, StockStatus::InStock]
        );
        assert_eq!(manager.critical_alerts().len(), 1);
    }

    #[test]
    fn test_update_stock_recomputes_status() {
        let mut manager = PharmacyManager::default();

        let item = manager.update_stock("1", 0).unwrap();
        assert_eq!(item.status, StockStatus::OutOfStock);
        assert_eq!(item.status.as_str(), "Out of Stock");

        let item = manager.update_stock("1", 20).unwrap();
        assert_eq!(item.status.as_str(), "Low Stock");

        let item = manager.update_stock("2", 100).unwrap();
        assert_eq!(item.status.as_str(), "In Stock");
        assert_eq!(item.last_restocked, Utc::now().format("%Y-%m-%d").to_string());
    }

    #[test]
    fn test_update_unknown_item() {
        let mut manager = PharmacyManager::default();
        assert_eq!(
            manager.update_stock("99", 5).unwrap_err(),
            PharmacyError::UnknownMedication("99".into())
        );
    }

    #[test]
    fn test_demand_counts_recent_prescriptions_only() {
        let now = Utc::now();
        let mut manager = PharmacyManager::default();
        manager.add_prescription_to_history(prescription("Paracetamol 500mg", 10, now - Duration::days(3)));
        manager.add_prescription_to_history(prescription("Paracetamol 500mg", 6, now - Duration::days(10)));
        manager.add_prescription_to_history(prescription("Paracetamol 500mg", 50, now - Duration::days(45)));

        let stock = manager.analyze_demand_at(now);
        // ceil(16 * 1.2) = 20
        assert_eq!(stock[0].demand_prediction, 20);
        assert_eq!(stock[1].demand_prediction, 0);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut manager = PharmacyManager::default();
        manager.update_stock("3", 5).unwrap();

        let restored = PharmacyManager::from_snapshot(manager.snapshot());
        assert_eq!(restored.stock(), manager.stock());
    }
}
