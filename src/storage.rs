// ============================================================================
// PERSISTENCE - bincode snapshot of the ledger with size and sanity checks
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::ledger::{Ledger, default_categories};

const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024; // 50 MB max
const LEDGER_FILE: &str = "ledger.bin";

/// What goes to disk: the ledger plus the bits of session state worth keeping.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LedgerData {
    pub ledger: Ledger,
    pub fix_date: bool,
    pub selected_month: Option<String>,
}

impl LedgerData {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            ..Self::default()
        }
    }

    /// Repairs anything a hand-edited or older file could get wrong.
    fn validate(&mut self) {
        if self.ledger.categories.is_empty() {
            self.ledger.categories = default_categories();
        }
        if self.ledger.active_categories().next().is_none() {
            for category in &mut self.ledger.categories {
                category.deleted = false;
            }
        }
        for cost in &mut self.ledger.fixed_costs {
            cost.day = cost.day.clamp(1, 365);
        }
        let mut seen = std::collections::HashSet::new();
        self.ledger.transactions.retain(|t| seen.insert(t.id));
        if let Some(month) = &self.selected_month {
            if month.len() != 7 {
                self.selected_month = None;
            }
        }
    }
}

pub fn ledger_file(data_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    Ok(data_dir.join(LEDGER_FILE))
}

pub fn save_ledger(data: &LedgerData, data_dir: &Path) -> Result<()> {
    let file_path = ledger_file(data_dir)?;
    let serialized = bincode::serialize(data)?;

    if serialized.len() as u64 > MAX_FILE_SIZE {
        return Err(anyhow!("Serialized data exceeds maximum size limit"));
    }

    // Write to a temp file first so a crash never leaves a half-written ledger
    let temp_path = file_path.with_extension("bin.tmp");
    fs::write(&temp_path, serialized)?;
    fs::rename(temp_path, &file_path)?;

    log::debug!(
        "saved {} transactions to {}",
        data.ledger.transactions.len(),
        file_path.display()
    );
    Ok(())
}

pub fn load_ledger(data_dir: &Path) -> Result<LedgerData> {
    let file_path = ledger_file(data_dir)?;
    if !file_path.exists() {
        log::info!("no ledger at {}, starting fresh", file_path.display());
        return Ok(LedgerData::new(Ledger::new()));
    }

    let metadata = fs::metadata(&file_path)?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(anyhow!(
            "Data file exceeds maximum size limit - possible corruption"
        ));
    }

    let bytes = fs::read(&file_path)?;
    let mut data: LedgerData = bincode::deserialize(&bytes).map_err(|e| {
        anyhow!("Failed to deserialize ledger (file may be corrupted): {}", e)
    })?;
    data.validate();

    log::info!(
        "loaded {} transactions from {}",
        data.ledger.transactions.len(),
        file_path.display()
    );
    Ok(data)
}

/// Loads the ledger, moving an unreadable file aside before starting empty so
/// the first save cannot overwrite it.
pub fn load_or_recover(data_dir: &Path) -> Result<LedgerData> {
    match load_ledger(data_dir) {
        Ok(data) => Ok(data),
        Err(err) => {
            let backup = backup_corrupt_ledger(data_dir)
                .map_err(|e| anyhow!("could not load ledger ({err}) nor back it up: {e}"))?;
            log::error!(
                "could not load ledger, moved it to {} and starting empty: {err:#}",
                backup.display()
            );
            Ok(LedgerData::new(Ledger::new()))
        }
    }
}

/// Renames the ledger file to `ledger.bin.bak`, or `ledger.bin.bak.N` when
/// earlier backups exist.
pub fn backup_corrupt_ledger(data_dir: &Path) -> Result<PathBuf> {
    let file_path = ledger_file(data_dir)?;
    let mut backup = file_path.with_extension("bin.bak");
    let mut n = 1;
    while backup.exists() {
        backup = file_path.with_extension(format!("bin.bak.{n}"));
        n += 1;
    }
    fs::rename(&file_path, &backup)?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ledger::{Category, FixedCost, Transaction};

    fn tx(amount: i64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
            "FOOD".to_string(),
            amount,
            "점심".to_string(),
        )
    }

    #[test]
    fn missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_ledger(dir.path()).unwrap();
        assert!(data.ledger.transactions.is_empty());
        assert!(!data.ledger.categories.is_empty());
    }

    #[test]
    fn save_then_load_keeps_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::new();
        ledger.add_transaction(tx(-12_000));
        ledger.set_budget("2026-02", 500_000);
        let data = LedgerData {
            ledger,
            fix_date: true,
            selected_month: Some("2026-02".into()),
        };
        save_ledger(&data, dir.path()).unwrap();

        let loaded = load_ledger(dir.path()).unwrap();
        assert_eq!(loaded.ledger.transactions, data.ledger.transactions);
        assert_eq!(loaded.ledger.budget_for("2026-02"), 500_000);
        assert!(loaded.fix_date);
        assert_eq!(loaded.selected_month.as_deref(), Some("2026-02"));
        assert!(!dir.path().join("ledger.bin.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEDGER_FILE), b"\xff\xff\xff\xff not bincode").unwrap();
        assert!(load_ledger(dir.path()).is_err());
    }

    #[test]
    fn corrupt_file_is_backed_up_before_starting_empty() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = b"\xff\xff\xff\xff not bincode";
        fs::write(dir.path().join(LEDGER_FILE), garbage).unwrap();

        let data = load_or_recover(dir.path()).unwrap();
        assert!(data.ledger.transactions.is_empty());
        assert!(!dir.path().join(LEDGER_FILE).exists());
        let backup = dir.path().join("ledger.bin.bak");
        assert_eq!(fs::read(&backup).unwrap(), garbage);

        // Saving the fresh ledger leaves the backup alone
        save_ledger(&data, dir.path()).unwrap();
        assert_eq!(fs::read(&backup).unwrap(), garbage);

        fs::write(dir.path().join(LEDGER_FILE), b"again").unwrap();
        load_or_recover(dir.path()).unwrap();
        assert_eq!(fs::read(dir.path().join("ledger.bin.bak.1")).unwrap(), b"again");
        assert_eq!(fs::read(&backup).unwrap(), garbage);
    }

    #[test]
    fn validate_repairs_loaded_data() {
        let mut ledger = Ledger::new();
        ledger.categories.clear();
        ledger.categories.push(Category {
            deleted: true,
            ..Category::new("OLD", "예전")
        });
        let dup = tx(-1_000);
        ledger.transactions = vec![dup.clone(), dup];
        ledger.fixed_costs.push(FixedCost {
            id: uuid::Uuid::new_v4(),
            category: "COMM".into(),
            amount: 50_000,
            day: 0,
            memo: String::new(),
            active: true,
        });
        let mut data = LedgerData {
            ledger,
            fix_date: false,
            selected_month: Some("garbage".into()),
        };
        data.validate();
        assert_eq!(data.ledger.categories.len(), 1);
        assert!(!data.ledger.categories[0].deleted);
        assert_eq!(data.ledger.transactions.len(), 1);
        assert_eq!(data.ledger.fixed_costs[0].day, 1);
        assert_eq!(data.selected_month, None);
    }
}
