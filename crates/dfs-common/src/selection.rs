use serde::{Deserialize, Serialize};

/// Players the user forced out of or into the next optimization.
///
/// Both lists keep insertion order for display. A name is never in both: moving it into
/// one list takes it out of the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSelection {
    excluded: Vec<String>,
    included: Vec<String>,
}

impl PlayerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn included(&self) -> &[String] {
        &self.included
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|p| p == name)
    }

    pub fn is_included(&self, name: &str) -> bool {
        self.included.iter().any(|p| p == name)
    }

    /// Neither forced in nor out; the lineup table only offers actions for these.
    pub fn is_undecided(&self, name: &str) -> bool {
        !self.is_excluded(name) && !self.is_included(name)
    }

    pub fn toggle_exclude(&mut self, name: &str) {
        Self::toggle(&mut self.excluded, &mut self.included, name);
    }

    pub fn toggle_include(&mut self, name: &str) {
        Self::toggle(&mut self.included, &mut self.excluded, name);
    }

    fn toggle(target: &mut Vec<String>, opposite: &mut Vec<String>, name: &str) {
        if let Some(pos) = target.iter().position(|p| p == name) {
            target.remove(pos);
        } else {
            opposite.retain(|p| p != name);
            target.push(name.to_string());
        }
    }
}
