//! Ordered prize catalog.

use crate::core::error::DrawError;
use crate::core::types::Prize;

/// Prizes in operator-defined order. Catalog order drives export order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrizeCatalog {
    prizes: Vec<Prize>,
}

impl PrizeCatalog {
    pub fn new(prizes: Vec<Prize>) -> Result<Self, DrawError> {
        let mut catalog = Self::default();
        for prize in prizes {
            catalog.add(prize)?;
        }
        Ok(catalog)
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn get(&self, id: &str) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == id)
    }

    pub fn first(&self) -> Option<&Prize> {
        self.prizes.first()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    /// Append a prize at the end of the catalog.
    pub fn add(&mut self, prize: Prize) -> Result<(), DrawError> {
        validate_prize(&prize)?;
        if self.get(&prize.id).is_some() {
            return Err(DrawError::InvalidPrize(format!(
                "duplicate prize id '{}'",
                prize.id
            )));
        }
        self.prizes.push(prize);
        Ok(())
    }

    /// Replace the prize with the same id, keeping its catalog position.
    pub fn update(&mut self, prize: Prize) -> Result<(), DrawError> {
        validate_prize(&prize)?;
        let slot = self
            .prizes
            .iter_mut()
            .find(|p| p.id == prize.id)
            .ok_or_else(|| DrawError::UnknownPrize(prize.id.clone()))?;
        *slot = prize;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Prize, DrawError> {
        let index = self
            .prizes
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DrawError::UnknownPrize(id.to_string()))?;
        Ok(self.prizes.remove(index))
    }
}

fn validate_prize(prize: &Prize) -> Result<(), DrawError> {
    if prize.id.trim().is_empty() {
        return Err(DrawError::InvalidPrize("id must be non-empty".to_string()));
    }
    if prize.count == 0 {
        return Err(DrawError::InvalidPrize(format!(
            "prize '{}' count must be >= 1",
            prize.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::prize;

    #[test]
    fn rejects_zero_count_and_duplicate_ids() {
        let mut catalog = PrizeCatalog::new(vec![prize("p1", 1)]).expect("catalog");

        assert!(matches!(
            catalog.add(prize("p2", 0)),
            Err(DrawError::InvalidPrize(_))
        ));
        assert!(matches!(
            catalog.add(prize("p1", 2)),
            Err(DrawError::InvalidPrize(_))
        ));
        assert_eq!(catalog.prizes().len(), 1);
    }

    #[test]
    fn update_keeps_position() {
        let mut catalog =
            PrizeCatalog::new(vec![prize("p1", 1), prize("p2", 3), prize("p3", 5)]).expect("catalog");
        let mut edited = prize("p2", 4);
        edited.name = "Renamed".to_string();

        catalog.update(edited).expect("update");

        let ids: Vec<&str> = catalog.prizes().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(catalog.get("p2").map(|p| p.count), Some(4));
        assert_eq!(catalog.get("p2").map(|p| p.name.as_str()), Some("Renamed"));
    }

    #[test]
    fn remove_unknown_prize_errors() {
        let mut catalog = PrizeCatalog::new(vec![prize("p1", 1)]).expect("catalog");
        assert_eq!(
            catalog.remove("nope"),
            Err(DrawError::UnknownPrize("nope".to_string()))
        );
    }
}
