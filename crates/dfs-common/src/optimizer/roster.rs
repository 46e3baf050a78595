use crate::Position;

pub const SALARY_CAP: u32 = 50_000;
pub const ROSTER_SIZE: u32 = 9;

/// Count requirement for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRule {
    Exactly(u32),
    AtLeast(u32),
}

impl SlotRule {
    pub fn minimum(self) -> u32 {
        match self {
            SlotRule::Exactly(n) | SlotRule::AtLeast(n) => n,
        }
    }

    pub fn allows(self, count: u32) -> bool {
        match self {
            SlotRule::Exactly(n) => count == n,
            SlotRule::AtLeast(n) => count >= n,
        }
    }

    /// Same kind of rule with the requirement lowered by one, saturating at zero.
    pub fn relaxed(self) -> Self {
        match self {
            SlotRule::Exactly(n) => SlotRule::Exactly(n.saturating_sub(1)),
            SlotRule::AtLeast(n) => SlotRule::AtLeast(n.saturating_sub(1)),
        }
    }
}

/// Salary cap, roster size and per-position rules for one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRules {
    pub budget: u32,
    pub slots: u32,
    rules: [SlotRule; 5],
}

impl Default for RosterRules {
    fn default() -> Self {
        Self::classic(false)
    }
}

impl RosterRules {
    /// DraftKings NFL classic. The flex slot is whatever the minimums leave over.
    pub fn classic(one_te: bool) -> Self {
        let te = if one_te {
            SlotRule::Exactly(1)
        } else {
            SlotRule::AtLeast(1)
        };
        Self {
            budget: SALARY_CAP,
            slots: ROSTER_SIZE,
            rules: [
                SlotRule::Exactly(1),
                SlotRule::AtLeast(2),
                SlotRule::AtLeast(3),
                te,
                SlotRule::Exactly(1),
            ],
        }
    }

    pub fn rule(&self, position: Position) -> SlotRule {
        self.rules[position.index()]
    }

    pub fn set_rule(&mut self, position: Position, rule: SlotRule) {
        self.rules[position.index()] = rule;
    }

    pub fn minimum_total(&self) -> u32 {
        self.rules.iter().map(|rule| rule.minimum()).sum()
    }

    /// Most players of `position` any valid roster can hold.
    pub fn max_count(&self, position: Position) -> u32 {
        match self.rule(position) {
            SlotRule::Exactly(n) => n,
            SlotRule::AtLeast(n) => {
                let others = self.minimum_total() - n;
                self.slots.saturating_sub(others)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_roster_leaves_one_flex() {
        let rules = RosterRules::default();
        assert_eq!(rules.budget, 50_000);
        assert_eq!(rules.slots, 9);
        assert_eq!(rules.minimum_total(), 8);
        assert_eq!(rules.max_count(Position::Qb), 1);
        assert_eq!(rules.max_count(Position::Rb), 3);
        assert_eq!(rules.max_count(Position::Wr), 4);
        assert_eq!(rules.max_count(Position::Te), 2);
        assert_eq!(rules.max_count(Position::Dst), 1);
    }

    #[test]
    fn one_te_pins_tight_end() {
        let rules = RosterRules::classic(true);
        assert_eq!(rules.rule(Position::Te), SlotRule::Exactly(1));
        assert_eq!(rules.max_count(Position::Te), 1);
        assert!(rules.rule(Position::Te).allows(1));
        assert!(!rules.rule(Position::Te).allows(2));
    }

    #[test]
    fn relaxing_saturates_at_zero() {
        assert_eq!(SlotRule::AtLeast(2).relaxed(), SlotRule::AtLeast(1));
        assert_eq!(SlotRule::Exactly(0).relaxed(), SlotRule::Exactly(0));
        assert!(SlotRule::AtLeast(0).allows(4));
    }
}
