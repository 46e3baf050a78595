use thiserror::Error;
use tracing::debug;

use super::roster::RosterRules;
use crate::Position;

/// Largest salary grid the knapsack tables are built over.
pub const MAX_UNITS: u32 = 2_000;

/// One player the solver may pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub position: Position,
    pub salary: u32,
    pub points: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("no roster of {slots} players meets the position rules under a budget of {budget}")]
    Infeasible { slots: u32, budget: u32 },
}

/// Pick the roster with the most points.
///
/// Exactly `rules.slots` candidates are chosen, their salaries sum to at most
/// `rules.budget`, and every position count satisfies its rule. Returns indices into
/// `candidates` in ascending order.
pub fn solve(candidates: &[Candidate], rules: &RosterRules) -> Result<Vec<usize>, SolveError> {
    let infeasible = SolveError::Infeasible {
        slots: rules.slots,
        budget: rules.budget,
    };

    let scale = SalaryScale::new(rules.budget, candidates.iter().map(|c| c.salary));
    let capacity = scale.budget_units as usize;

    let tables: Vec<PositionTable> = Position::ALL
        .iter()
        .map(|&position| {
            let members: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.position == position)
                .map(|(i, _)| i)
                .collect();
            let kmax = (rules.max_count(position) as usize).min(members.len());
            PositionTable::build(candidates, members, kmax, capacity, &scale)
        })
        .collect();

    let allocations = allocations(rules, &tables);
    debug!(
        candidates = candidates.len(),
        unit = scale.unit,
        capacity,
        allocations = allocations.len(),
        "solving roster"
    );

    let mut best: Option<(f64, [usize; 5], Vec<Vec<usize>>)> = None;
    for counts in allocations {
        let (value, splits) = combine(&tables, &counts, capacity);
        if value == f64::NEG_INFINITY {
            continue;
        }
        if best.as_ref().is_none_or(|(top, _, _)| value > *top) {
            best = Some((value, counts, splits));
        }
    }

    let (_, counts, splits) = best.ok_or(infeasible)?;

    let mut budgets = [0usize; 5];
    let mut remaining = capacity;
    for idx in (1..Position::ALL.len()).rev() {
        let spent = splits[idx - 1][remaining];
        budgets[idx] = spent;
        remaining -= spent;
    }
    budgets[0] = remaining;

    let mut picked: Vec<usize> = tables
        .iter()
        .zip(counts)
        .zip(budgets)
        .flat_map(|((table, count), budget)| table.reconstruct(count, budget))
        .collect();
    picked.sort_unstable();
    Ok(picked)
}

/// Maps dollar salaries onto a small integer grid.
///
/// Salaries and budget are divided by their common divisor. When that grid is still too
/// fine, a coarser unit is used with salaries rounded up and the budget rounded down, so a
/// roster that fits the grid also fits the real cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SalaryScale {
    unit: u32,
    budget_units: u32,
}

impl SalaryScale {
    fn new(budget: u32, salaries: impl Iterator<Item = u32>) -> Self {
        let unit = salaries.fold(budget, gcd).max(1);
        if budget / unit <= MAX_UNITS {
            return Self {
                unit,
                budget_units: budget / unit,
            };
        }

        let unit = budget.div_ceil(MAX_UNITS);
        Self {
            unit,
            budget_units: budget / unit,
        }
    }

    fn units(&self, salary: u32) -> usize {
        salary.div_ceil(self.unit) as usize
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Packed take/skip decisions indexed by (item, count, units).
#[derive(Debug)]
struct DecisionBits {
    words: Vec<u64>,
    counts: usize,
    units: usize,
}

impl DecisionBits {
    fn new(items: usize, counts: usize, units: usize) -> Self {
        let bits = items * counts * units;
        Self {
            words: vec![0; bits.div_ceil(64)],
            counts,
            units,
        }
    }

    fn offset(&self, item: usize, count: usize, units: usize) -> usize {
        (item * self.counts + count) * self.units + units
    }

    fn set(&mut self, item: usize, count: usize, units: usize) {
        let bit = self.offset(item, count, units);
        self.words[bit / 64] |= 1 << (bit % 64);
    }

    fn get(&self, item: usize, count: usize, units: usize) -> bool {
        let bit = self.offset(item, count, units);
        self.words[bit / 64] & (1 << (bit % 64)) != 0
    }
}

/// Best points for exactly `k` players of one position within `s` salary units.
#[derive(Debug)]
struct PositionTable {
    members: Vec<usize>,
    costs: Vec<usize>,
    kmax: usize,
    best: Vec<Vec<f64>>,
    taken: DecisionBits,
}

impl PositionTable {
    fn build(
        candidates: &[Candidate],
        members: Vec<usize>,
        kmax: usize,
        capacity: usize,
        scale: &SalaryScale,
    ) -> Self {
        let costs: Vec<usize> = members
            .iter()
            .map(|&i| scale.units(candidates[i].salary))
            .collect();

        let mut best = vec![vec![f64::NEG_INFINITY; capacity + 1]; kmax + 1];
        best[0].fill(0.0);
        let mut taken = DecisionBits::new(members.len(), kmax + 1, capacity + 1);

        for (item, &member) in members.iter().enumerate() {
            let cost = costs[item];
            if cost > capacity {
                continue;
            }
            let points = candidates[member].points;

            for k in (1..=kmax).rev() {
                let (lower, upper) = best.split_at_mut(k);
                let prev = &lower[k - 1];
                let row = &mut upper[0];
                for s in cost..=capacity {
                    let value = prev[s - cost] + points;
                    if value > row[s] {
                        row[s] = value;
                        taken.set(item, k, s);
                    }
                }
            }
        }

        Self {
            members,
            costs,
            kmax,
            best,
            taken,
        }
    }

    fn row(&self, count: usize) -> &[f64] {
        &self.best[count]
    }

    fn reconstruct(&self, count: usize, budget: usize) -> Vec<usize> {
        let mut picked = Vec::with_capacity(count);
        let (mut k, mut s) = (count, budget);
        for item in (0..self.members.len()).rev() {
            if k == 0 {
                break;
            }
            if self.taken.get(item, k, s) {
                picked.push(self.members[item]);
                k -= 1;
                s -= self.costs[item];
            }
        }
        picked
    }
}

/// Per-position counts that satisfy every rule and fill the roster exactly.
fn allocations(rules: &RosterRules, tables: &[PositionTable]) -> Vec<[usize; 5]> {
    fn fill(
        idx: usize,
        remaining: usize,
        rules: &RosterRules,
        tables: &[PositionTable],
        counts: &mut [usize; 5],
        out: &mut Vec<[usize; 5]>,
    ) {
        if idx == Position::ALL.len() {
            if remaining == 0 {
                out.push(*counts);
            }
            return;
        }

        let rule = rules.rule(Position::ALL[idx]);
        let low = rule.minimum() as usize;
        let high = tables[idx].kmax.min(remaining);
        for count in low..=high {
            if rule.allows(count as u32) {
                counts[idx] = count;
                fill(idx + 1, remaining - count, rules, tables, counts, out);
            }
        }
    }

    let mut out = Vec::new();
    let mut counts = [0usize; 5];
    fill(0, rules.slots as usize, rules, tables, &mut counts, &mut out);
    out
}

/// Max-plus convolution of the per-position rows for one allocation.
/// Returns the best total at full capacity and, per later position, the units it received.
fn combine(
    tables: &[PositionTable],
    counts: &[usize; 5],
    capacity: usize,
) -> (f64, Vec<Vec<usize>>) {
    let mut acc = tables[0].row(counts[0]).to_vec();
    let mut splits = Vec::with_capacity(tables.len() - 1);

    for (table, &count) in tables.iter().zip(counts).skip(1) {
        let row = table.row(count);
        let mut next = vec![f64::NEG_INFINITY; capacity + 1];
        let mut split = vec![0usize; capacity + 1];
        for s in 0..=capacity {
            for t in 0..=s {
                let value = acc[s - t] + row[t];
                if value > next[s] {
                    next[s] = value;
                    split[s] = t;
                }
            }
        }
        acc = next;
        splits.push(split);
    }

    (acc[capacity], splits)
}
