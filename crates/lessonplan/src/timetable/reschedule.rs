//! Relocation of a missed lecture to the next viable slot.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::Entry;
use super::{count_on_date, entries_after, find_by_date, sort_by_date};

/// Errors that can occur while rescheduling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RescheduleError {
    /// No entry exists on the missed date
    #[error("Current entry not found")]
    NotFound { date: String },

    /// Every tier came up empty
    #[error("No available slots found in the semester")]
    NoSlotAvailable,
}

/// Which search tier produced the target slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// A holiday or non-teaching day was repurposed
    NonTeaching,
    /// A vacant teaching day was filled
    Vacant,
    /// An extra lecture was added on a teaching day
    ExtraLecture,
}

/// What happens to an entry already sitting on the date chosen for an
/// extra lecture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The existing entry is removed and the extra lecture takes its place.
    #[default]
    Replace,
    /// The existing entry stays; the date ends up with two entries.
    Keep,
}

/// Resolved relocation target.
#[derive(Debug, Clone)]
enum Target {
    /// Index of an existing entry to repurpose
    Existing(usize),
    /// Synthesized slot on a teaching date
    Extra(String),
}

/// Result of a successful reschedule.
#[derive(Debug, Clone)]
pub struct Rescheduled {
    /// The whole timetable, sorted ascending by date
    pub timetable: Vec<Entry>,
    pub target_date: String,
    pub tier: Tier,
    /// Entries removed by [`CollisionPolicy::Replace`]
    pub dropped: Vec<Entry>,
}

/// Applies the three-tier rescheduling policy to a timetable.
#[derive(Debug, Clone)]
pub struct Rescheduler {
    collision_policy: CollisionPolicy,
    max_lectures_per_day: usize,
}

impl Default for Rescheduler {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::Replace,
            max_lectures_per_day: 2,
        }
    }
}

impl Rescheduler {
    pub fn new(collision_policy: CollisionPolicy, max_lectures_per_day: usize) -> Self {
        Self {
            collision_policy,
            max_lectures_per_day,
        }
    }

    /// Moves the content of the entry on `current_date` to the best slot
    /// after it.
    ///
    /// Slots are tried in this order, each time taking the earliest match
    /// strictly after `current_date`:
    /// 1. a holiday or non-teaching day,
    /// 2. a vacant day,
    /// 3. a date holding fewer than `max_lectures_per_day` entries, which
    ///    receives an extra lecture.
    ///
    /// The input is never modified; on error the caller's timetable is
    /// exactly as it was.
    ///
    /// # Returns
    /// * `Ok(Rescheduled)` - The updated, sorted timetable and where the topic went
    /// * `Err(RescheduleError::NotFound)` - No entry on `current_date`
    /// * `Err(RescheduleError::NoSlotAvailable)` - No tier found a slot
    pub fn reschedule(
        &self,
        timetable: &[Entry],
        current_date: &str,
    ) -> Result<Rescheduled, RescheduleError> {
        let current = find_by_date(timetable, current_date)
            .ok_or_else(|| RescheduleError::NotFound {
                date: current_date.to_string(),
            })?
            .clone();

        let (target, tier) = self
            .find_target(timetable, current_date)
            .ok_or(RescheduleError::NoSlotAvailable)?;

        let mut updated = timetable.to_vec();
        let mut dropped = Vec::new();

        let target_date = match target {
            Target::Existing(idx) => {
                let slot = &mut updated[idx];
                let original_kind = slot.kind.clone();
                slot.kind = current.kind.clone();
                slot.details = current.details.clone();
                slot.status = Some(format!(
                    "Rescheduled from {current_date} (Originally {original_kind})"
                ));
                slot.date.clone()
            }
            Target::Extra(date) => {
                for entry in updated.iter_mut().filter(|e| e.date == current_date) {
                    entry.status = Some("Rescheduled".to_string());
                }

                // Replace removes at most one entry, whatever the daily cap
                if self.collision_policy == CollisionPolicy::Replace {
                    if let Some(idx) = updated.iter().position(|e| e.date == date) {
                        let removed = updated.remove(idx);
                        warn!("Extra lecture on {} replaces a {} entry", date, removed.kind);
                        dropped.push(removed);
                    }
                }

                let mut extra = Entry::new(date.clone(), current.kind.clone(), current.details.clone());
                extra.status = Some(format!("Rescheduled from {current_date} (Extra Lecture)"));
                updated.push(extra);
                date
            }
        };

        sort_by_date(&mut updated);

        Ok(Rescheduled {
            timetable: updated,
            target_date,
            tier,
            dropped,
        })
    }

    fn find_target(&self, timetable: &[Entry], current_date: &str) -> Option<(Target, Tier)> {
        let earliest_matching = |pred: fn(&Entry) -> bool| {
            timetable
                .iter()
                .enumerate()
                .filter(|(_, e)| e.date.as_str() > current_date && pred(e))
                .min_by(|(_, a), (_, b)| a.date.cmp(&b.date))
                .map(|(idx, _)| idx)
        };

        if let Some(idx) = earliest_matching(|e| e.kind.is_non_teaching()) {
            debug!("Found non-teaching slot on {}", timetable[idx].date);
            return Some((Target::Existing(idx), Tier::NonTeaching));
        }

        if let Some(idx) = earliest_matching(|e| e.kind.is_vacant()) {
            debug!("Found vacant slot on {}", timetable[idx].date);
            return Some((Target::Existing(idx), Tier::Vacant));
        }

        entries_after(timetable, current_date)
            .into_iter()
            .find(|e| count_on_date(timetable, &e.date) < self.max_lectures_per_day)
            .map(|e| (Target::Extra(e.date.clone()), Tier::ExtraLecture))
    }
}
