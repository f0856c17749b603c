//! Flatten the ledger into export rows.

use std::fmt;

use crate::core::catalog::PrizeCatalog;
use crate::core::ledger::WinnerLedger;
use crate::core::types::WinnerRow;

/// Nothing to export yet. Non-fatal; no file should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyExportWarning;

impl fmt::Display for EmptyExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no winners recorded yet; nothing to export")
    }
}

impl std::error::Error for EmptyExportWarning {}

/// One row per winner: prizes in catalog order, winners in win order.
///
/// Winners recorded under prizes no longer in the catalog are not exported.
pub fn winner_rows(
    ledger: &WinnerLedger,
    catalog: &PrizeCatalog,
) -> Result<Vec<WinnerRow>, EmptyExportWarning> {
    let rows: Vec<WinnerRow> = catalog
        .prizes()
        .iter()
        .flat_map(|prize| {
            ledger.winners(&prize.id).iter().map(|winner| WinnerRow {
                prize: prize.name.clone(),
                name: winner.name.clone(),
                department: winner.department.clone().unwrap_or_default(),
                id: winner.id.clone(),
            })
        })
        .collect();
    if rows.is_empty() {
        return Err(EmptyExportWarning);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{participant, prize};

    #[test]
    fn rows_follow_catalog_order_not_ledger_order() {
        let catalog = PrizeCatalog::new(vec![prize("p1", 1), prize("p2", 1)]).expect("catalog");
        let mut ledger = WinnerLedger::default();
        ledger.record("p2", 1, participant("X")).expect("record");
        ledger.record("p1", 1, participant("Y")).expect("record");

        let rows = winner_rows(&ledger, &catalog).expect("rows");

        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["Y", "X"]);
        assert_eq!(rows[0].prize, "p1 prize");
    }

    #[test]
    fn winners_keep_win_order_within_prize() {
        let catalog = PrizeCatalog::new(vec![prize("p1", 3)]).expect("catalog");
        let mut ledger = WinnerLedger::default();
        for id in ["c", "a", "b"] {
            ledger.record("p1", 3, participant(id)).expect("record");
        }

        let rows = winner_rows(&ledger, &catalog).expect("rows");

        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn missing_department_exports_empty() {
        let catalog = PrizeCatalog::new(vec![prize("p1", 2)]).expect("catalog");
        let mut ledger = WinnerLedger::default();
        ledger
            .record("p1", 2, participant("a").with_department("Sales"))
            .expect("record");
        ledger.record("p1", 2, participant("b")).expect("record");

        let rows = winner_rows(&ledger, &catalog).expect("rows");

        assert_eq!(rows[0].department, "Sales");
        assert_eq!(rows[1].department, "");
    }

    #[test]
    fn empty_ledger_warns() {
        let catalog = PrizeCatalog::new(vec![prize("p1", 1)]).expect("catalog");
        assert_eq!(
            winner_rows(&WinnerLedger::default(), &catalog),
            Err(EmptyExportWarning)
        );
    }
}
