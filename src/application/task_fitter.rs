use crate::application::scheduler::WeeklyResult;
use crate::domain::models::{FreeSlot, SlotKey};
use crate::domain::problems::PlanProblem;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum FitOutcome {
    /// One slot is long enough on its own.
    Single { slot: FreeSlot },
    /// 2 or 3 slots, in pool order, whose sum covers the task.
    Split {
        slots: Vec<FreeSlot>,
        total_minutes: u32,
        overage_minutes: u32,
    },
    NoFit,
}

impl FitOutcome {
    pub fn slots(&self) -> &[FreeSlot] {
        match self {
            Self::Single { slot } => std::slice::from_ref(slot),
            Self::Split { slots, .. } => slots,
            Self::NoFit => &[],
        }
    }

    /// Slots a renderer should highlight.
    pub fn highlighted(&self) -> Vec<SlotKey> {
        self.slots().iter().map(FreeSlot::key).collect()
    }
}

#[derive(Debug, Clone)]
struct SplitCandidate {
    indices: Vec<usize>,
    total: u32,
}

/// Runs the fitter over every slot of a computed week.
pub fn fit_task(result: &WeeklyResult, required_minutes: u32) -> Result<FitOutcome, PlanProblem> {
    fit_slots(result.slot_pool(), required_minutes)
}

/// First single slot that covers `required_minutes`, otherwise the 2 or 3 slot
/// combination with the least leftover time.
pub fn fit_slots(mut pool: Vec<FreeSlot>, required_minutes: u32) -> Result<FitOutcome, PlanProblem> {
    if required_minutes == 0 {
        return Err(PlanProblem::InvalidTaskDuration);
    }
    pool.sort_by_key(|slot| (slot.weekday, slot.start));

    if let Some(slot) = pool
        .iter()
        .find(|slot| slot.duration_minutes() >= required_minutes)
    {
        return Ok(FitOutcome::Single { slot: *slot });
    }

    let durations = pool.iter().map(FreeSlot::duration_minutes).collect::<Vec<_>>();
    let mut best: Option<SplitCandidate> = None;
    let mut consider = |indices: &[usize]| {
        let total = indices.iter().map(|&index| durations[index]).sum::<u32>();
        if total < required_minutes {
            return;
        }
        let better = match &best {
            None => true,
            Some(current) => {
                let overage = total - required_minutes;
                let current_overage = current.total - required_minutes;
                overage < current_overage || (overage == current_overage && total < current.total)
            }
        };
        if better {
            best = Some(SplitCandidate {
                indices: indices.to_vec(),
                total,
            });
        }
    };

    let count = pool.len();
    for first in 0..count {
        for second in first + 1..count {
            consider(&[first, second]);
        }
    }
    for first in 0..count {
        for second in first + 1..count {
            for third in second + 1..count {
                consider(&[first, second, third]);
            }
        }
    }

    Ok(match best {
        Some(candidate) => FitOutcome::Split {
            slots: candidate.indices.iter().map(|&index| pool[index]).collect(),
            total_minutes: candidate.total,
            overage_minutes: candidate.total - required_minutes,
        },
        None => FitOutcome::NoFit,
    })
}
