//! Built-in prize catalog and mock roster for sessions without input files.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::types::{Participant, Prize};

const MOCK_DEPARTMENTS: [&str; 5] = ["技术部", "产品部", "设计部", "市场部", "人事部"];

/// Five prizes from grand prize down to the lucky draw.
pub fn default_prizes() -> Vec<Prize> {
    [
        ("p1", "特等奖: 未来探索之旅 (SpaceX 参观)", 1, "🚀"),
        ("p2", "一等奖: MacBook Pro M3", 3, "💻"),
        ("p3", "二等奖: iPhone 16 Pro", 5, "📱"),
        ("p4", "三等奖: PS5 Pro + VR2", 10, "🎮"),
        ("p5", "幸运奖: 机械键盘", 20, "⌨️"),
    ]
    .into_iter()
    .zip(1u32..)
    .map(|((id, name, count, image), level)| Prize {
        id: id.to_string(),
        name: name.to_string(),
        count,
        level,
        image: Some(image.to_string()),
    })
    .collect()
}

/// `count` placeholder employees `u0..`, each in a random department.
pub fn mock_participants<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Vec<Participant> {
    (0..count)
        .map(|i| {
            let department = MOCK_DEPARTMENTS.choose(rng).copied().unwrap_or("General");
            Participant::new(format!("u{i}"), format!("员工 {}", i + 1)).with_department(department)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_rng;

    #[test]
    fn default_prizes_are_ranked_in_order() {
        let prizes = default_prizes();
        let summary: Vec<(&str, u32, u32)> = prizes
            .iter()
            .map(|p| (p.id.as_str(), p.count, p.level))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("p1", 1, 1),
                ("p2", 3, 2),
                ("p3", 5, 3),
                ("p4", 10, 4),
                ("p5", 20, 5)
            ]
        );
    }

    #[test]
    fn mock_roster_has_unique_ids_and_known_departments() {
        let roster = mock_participants(50, &mut seeded_rng(1));
        assert_eq!(roster.len(), 50);
        assert_eq!(roster[0].id, "u0");
        assert_eq!(roster[0].name, "员工 1");
        assert_eq!(roster[49].id, "u49");
        assert!(roster.iter().all(|p| {
            p.department
                .as_deref()
                .is_some_and(|d| MOCK_DEPARTMENTS.contains(&d))
        }));
    }
}
