//! Itinerary store.
//!
//! Owns the current trip as an immutable snapshot. Every mutation builds a new
//! `Arc<Trip>` and swaps it in; snapshots already handed out are never touched,
//! so callers can diff old against new or detect stale work by pointer.

use std::sync::Arc;

use crate::error::ItineraryError;
use crate::models::{Activity, Day, Trip};

/// Direction for `move_activity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards the start of the day (-1)
    Earlier,
    /// Towards the end of the day (+1)
    Later,
}

impl TryFrom<i32> for MoveDirection {
    type Error = ItineraryError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(MoveDirection::Earlier),
            1 => Ok(MoveDirection::Later),
            other => Err(ItineraryError::InvalidDirection(other)),
        }
    }
}

/// A single edit to the itinerary.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddActivity {
        day_index: usize,
        activity: Activity,
    },
    RemoveActivity {
        day_index: usize,
        activity_index: usize,
    },
    MoveActivity {
        day_index: usize,
        activity_index: usize,
        direction: MoveDirection,
    },
    SetDescription {
        day_index: usize,
        activity_index: usize,
        description: String,
    },
    LoadTrip(Trip),
}

#[derive(Debug, Clone, Default)]
pub struct ItineraryStore {
    current: Arc<Trip>,
}

impl ItineraryStore {
    /// Store holding an empty trip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `trip`, which must satisfy the day-number invariant.
    pub fn with_trip(trip: Trip) -> Result<Self, ItineraryError> {
        validate_day_numbers(&trip.days)?;
        Ok(Self {
            current: Arc::new(trip),
        })
    }

    /// The current snapshot.
    pub fn trip(&self) -> &Arc<Trip> {
        &self.current
    }

    pub fn apply(&mut self, mutation: Mutation) -> Result<Arc<Trip>, ItineraryError> {
        match mutation {
            Mutation::AddActivity {
                day_index,
                activity,
            } => self.add_activity(day_index, activity),
            Mutation::RemoveActivity {
                day_index,
                activity_index,
            } => self.remove_activity(day_index, activity_index),
            Mutation::MoveActivity {
                day_index,
                activity_index,
                direction,
            } => self.move_activity(day_index, activity_index, direction),
            Mutation::SetDescription {
                day_index,
                activity_index,
                description,
            } => self.set_description(day_index, activity_index, description),
            Mutation::LoadTrip(trip) => self.load_trip(trip),
        }
    }

    /// Append `activity` to the end of the addressed day.
    pub fn add_activity(
        &mut self,
        day_index: usize,
        activity: Activity,
    ) -> Result<Arc<Trip>, ItineraryError> {
        self.check_day(day_index)?;
        Ok(self.commit(|trip| trip.days[day_index].activities.push(activity)))
    }

    /// Remove one activity, keeping the rest in order.
    pub fn remove_activity(
        &mut self,
        day_index: usize,
        activity_index: usize,
    ) -> Result<Arc<Trip>, ItineraryError> {
        self.check_activity(day_index, activity_index)?;
        Ok(self.commit(|trip| {
            trip.days[day_index].activities.remove(activity_index);
        }))
    }

    /// Swap an activity with its neighbour. Moving past either end of the day
    /// returns the current snapshot unchanged.
    pub fn move_activity(
        &mut self,
        day_index: usize,
        activity_index: usize,
        direction: MoveDirection,
    ) -> Result<Arc<Trip>, ItineraryError> {
        let len = self.check_activity(day_index, activity_index)?;
        let target = match direction {
            MoveDirection::Earlier => activity_index.checked_sub(1),
            MoveDirection::Later => Some(activity_index + 1).filter(|&idx| idx < len),
        };

        match target {
            Some(target) => Ok(self.commit(|trip| {
                trip.days[day_index].activities.swap(activity_index, target);
            })),
            None => Ok(Arc::clone(&self.current)),
        }
    }

    /// Replace an activity's free-text description.
    pub fn set_description(
        &mut self,
        day_index: usize,
        activity_index: usize,
        description: impl Into<String>,
    ) -> Result<Arc<Trip>, ItineraryError> {
        self.check_activity(day_index, activity_index)?;
        let description = description.into();
        Ok(self.commit(|trip| {
            trip.days[day_index].activities[activity_index].description = description;
        }))
    }

    /// Replace the whole trip.
    pub fn load_trip(&mut self, trip: Trip) -> Result<Arc<Trip>, ItineraryError> {
        validate_day_numbers(&trip.days)?;
        self.current = Arc::new(trip);
        Ok(Arc::clone(&self.current))
    }

    fn commit(&mut self, edit: impl FnOnce(&mut Trip)) -> Arc<Trip> {
        let mut next = Trip::clone(&self.current);
        edit(&mut next);
        self.current = Arc::new(next);
        Arc::clone(&self.current)
    }

    fn check_day(&self, day_index: usize) -> Result<&Day, ItineraryError> {
        self.current
            .days
            .get(day_index)
            .ok_or(ItineraryError::DayOutOfRange {
                index: day_index,
                len: self.current.days.len(),
            })
    }

    /// Returns the day's activity count on success.
    fn check_activity(&self, day_index: usize, activity_index: usize) -> Result<usize, ItineraryError> {
        let len = self.check_day(day_index)?.activities.len();
        if activity_index >= len {
            return Err(ItineraryError::ActivityOutOfRange {
                day_index,
                index: activity_index,
                len,
            });
        }
        Ok(len)
    }
}

/// Day numbers must be exactly 1..=N in sequence.
pub fn validate_day_numbers(days: &[Day]) -> Result<(), ItineraryError> {
    for (idx, day) in days.iter().enumerate() {
        let expected = idx as u32 + 1;
        if day.day != expected {
            return Err(ItineraryError::NonContiguousDays {
                expected,
                found: day.day,
            });
        }
    }
    Ok(())
}
