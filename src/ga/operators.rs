//! Structure-preserving mutation operators.
//!
//! Every operator maps a valid mirrored schedule to a new schedule that
//! is still a double round-robin; operators that can break the home/away
//! run rule re-check it and retry over their whole option space.
//!
//! | Operator | Effect | Can fail |
//! |----------|--------|----------|
//! | `Regenerate` | fresh random schedule | no |
//! | `SwapGameSlots` | exchange two first-half slots (and mirrors) | yes |
//! | `InvertSlot` | flip venues in one slot (and mirror) | yes |
//! | `InvertSchedule` | flip every venue | no |
//!
//! [`MutationEngine::mutate`] draws operators uniformly without
//! replacement and returns the first success. Two operators never fail,
//! so a mutation always succeeds.

use rand::Rng;

use super::generator::ScheduleGenerator;
use crate::error::TtpResult;
use crate::models::Schedule;
use crate::validation::is_valid;

/// Mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOperator {
    /// Replace the parent with a freshly generated schedule.
    Regenerate,
    /// Swap two first-half rounds together with their mirrored rounds.
    SwapGameSlots,
    /// Flip home and away for one first-half round and its mirror.
    InvertSlot,
    /// Flip home and away for every fixture.
    InvertSchedule,
}

impl MutationOperator {
    /// Every operator, in declaration order.
    pub const ALL: [MutationOperator; 4] = [
        MutationOperator::Regenerate,
        MutationOperator::SwapGameSlots,
        MutationOperator::InvertSlot,
        MutationOperator::InvertSchedule,
    ];

    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Regenerate => "regenerate",
            Self::SwapGameSlots => "swap_game_slots",
            Self::InvertSlot => "invert_slot",
            Self::InvertSchedule => "invert_schedule",
        }
    }

    /// Position in [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A mutated child and the operator that produced it.
#[derive(Debug, Clone)]
pub struct Mutation {
    /// The new schedule.
    pub schedule: Schedule,
    /// Operator that succeeded.
    pub operator: MutationOperator,
}

/// Applies mutation operators to schedules.
#[derive(Debug, Clone)]
pub struct MutationEngine {
    generator: ScheduleGenerator,
}

impl MutationEngine {
    /// Creates an engine; `generator` backs the `Regenerate` operator.
    pub fn new(generator: ScheduleGenerator) -> Self {
        Self { generator }
    }

    /// Produces a valid child from `parent`.
    ///
    /// Operators are drawn uniformly from a shrinking set; each one is
    /// exhausted before the next is drawn. The parent is never modified.
    ///
    /// # Errors
    /// Only if `Regenerate` is drawn and construction exceeds its budget.
    pub fn mutate<R: Rng + ?Sized>(&self, parent: &Schedule, rng: &mut R) -> TtpResult<Mutation> {
        let mut remaining: Vec<usize> = (0..MutationOperator::ALL.len()).collect();

        while !remaining.is_empty() {
            let pick = rng.random_range(0..remaining.len());
            let operator = MutationOperator::ALL[remaining.swap_remove(pick)];
            if let Some(schedule) = self.apply(operator, parent, rng)? {
                return Ok(Mutation { schedule, operator });
            }
        }

        // Unreachable in practice: InvertSchedule always succeeds.
        Ok(Mutation {
            schedule: invert_schedule(parent),
            operator: MutationOperator::InvertSchedule,
        })
    }

    /// Applies one operator. `None` means its option space held no valid
    /// child.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        operator: MutationOperator,
        parent: &Schedule,
        rng: &mut R,
    ) -> TtpResult<Option<Schedule>> {
        Ok(match operator {
            MutationOperator::Regenerate => Some(self.generator.generate(rng)?),
            MutationOperator::SwapGameSlots => swap_game_slots(parent, rng),
            MutationOperator::InvertSlot => invert_slot(parent, rng),
            MutationOperator::InvertSchedule => Some(invert_schedule(parent)),
        })
    }
}

// ======================== Operators ========================

/// Swaps a random pair of first-half slots, trying untried pairs until the
/// result satisfies the run rule.
///
/// Returns `None` once every unordered pair has been tried.
pub fn swap_game_slots<R: Rng + ?Sized>(parent: &Schedule, rng: &mut R) -> Option<Schedule> {
    let games = parent.games();
    let mut pairs: Vec<(usize, usize)> = (0..games)
        .flat_map(|a| ((a + 1)..games).map(move |b| (a, b)))
        .collect();

    while !pairs.is_empty() {
        let (a, b) = pairs.swap_remove(rng.random_range(0..pairs.len()));
        let child = parent.with_slots_swapped(a, b);
        if is_valid(&child) {
            return Some(child);
        }
    }
    None
}

/// Inverts a random first-half slot, trying untried slots until the result
/// satisfies the run rule.
///
/// Returns `None` once every slot has been tried.
pub fn invert_slot<R: Rng + ?Sized>(parent: &Schedule, rng: &mut R) -> Option<Schedule> {
    let mut slots: Vec<usize> = (0..parent.games()).collect();

    while !slots.is_empty() {
        let slot = slots.swap_remove(rng.random_range(0..slots.len()));
        let child = parent.with_slot_inverted(slot);
        if is_valid(&child) {
            return Some(child);
        }
    }
    None
}

/// Flips every fixture. Run lengths are unchanged, so the result is valid
/// whenever the parent is.
pub fn invert_schedule(parent: &Schedule) -> Schedule {
    parent.inverted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::generator::GeneratorConfig;
    use crate::test_support::four_team_schedule;
    use crate::validation::validate_schedule;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn engine(teams: usize) -> MutationEngine {
        MutationEngine::new(ScheduleGenerator::new(teams, GeneratorConfig::default()))
    }

    #[test]
    fn test_mutate_returns_valid_children() {
        let engine = engine(8);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut parent = ScheduleGenerator::new(8, GeneratorConfig::default())
            .generate(&mut rng)
            .unwrap();
        for _ in 0..50 {
            let child = engine.mutate(&parent, &mut rng).unwrap();
            assert!(validate_schedule(&child.schedule).is_ok());
            assert!(child.schedule.is_mirrored());
            parent = child.schedule;
        }
    }

    #[test]
    fn test_mutate_leaves_parent_untouched() {
        let engine = engine(4);
        let parent = four_team_schedule();
        let snapshot = parent.clone();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let _ = engine.mutate(&parent, &mut rng).unwrap();
        }
        assert_eq!(parent, snapshot);
    }

    #[test]
    fn test_every_operator_gets_drawn() {
        let engine = engine(6);
        let mut rng = SmallRng::seed_from_u64(3);
        let parent = ScheduleGenerator::new(6, GeneratorConfig::default())
            .generate(&mut rng)
            .unwrap();
        let seen: HashSet<MutationOperator> = (0..200)
            .map(|_| engine.mutate(&parent, &mut rng).unwrap().operator)
            .collect();
        assert!(seen.contains(&MutationOperator::Regenerate));
        assert!(seen.contains(&MutationOperator::InvertSchedule));
    }

    #[test]
    fn test_invert_schedule_involution() {
        let s = four_team_schedule();
        assert_eq!(invert_schedule(&invert_schedule(&s)), s);
        assert!(is_valid(&invert_schedule(&s)));
    }

    #[test]
    fn test_swap_game_slots_changes_order() {
        let s = four_team_schedule();
        let mut rng = SmallRng::seed_from_u64(42);
        let child = swap_game_slots(&s, &mut rng).expect("some swap is valid");
        assert_ne!(child, s);
        assert!(validate_schedule(&child).is_ok());
    }

    #[test]
    fn test_swap_with_single_slot_has_no_options() {
        let two = Schedule::from_rows(vec![vec![2, -2], vec![-1, 1]]).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(swap_game_slots(&two, &mut rng).is_none());
    }

    #[test]
    fn test_invert_slot_matches_valid_options() {
        let s = four_team_schedule();
        let mut rng = SmallRng::seed_from_u64(42);
        let valid_slots: Vec<usize> = (0..3)
            .filter(|&slot| is_valid(&s.with_slot_inverted(slot)))
            .collect();
        let child = invert_slot(&s, &mut rng);
        assert_eq!(child.is_some(), !valid_slots.is_empty());
        if let Some(child) = child {
            assert!(is_valid(&child));
        }
    }

    #[test]
    fn test_operator_metadata() {
        assert_eq!(MutationOperator::ALL.len(), 4);
        for (i, op) in MutationOperator::ALL.iter().enumerate() {
            assert_eq!(op.index(), i);
        }
        assert_eq!(MutationOperator::SwapGameSlots.name(), "swap_game_slots");
    }
}
