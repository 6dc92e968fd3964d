//! Sequential prev/next traversal over `1..=max_id`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    current_id: u16,
    max_id: u16,
}

impl Navigator {
    pub fn new(current_id: u16, max_id: u16) -> Result<Self, ValidationError> {
        if current_id == 0 || current_id > max_id {
            return Err(ValidationError::OutOfRange {
                id: i64::from(current_id),
                max: max_id,
            });
        }
        Ok(Self { current_id, max_id })
    }

    pub fn current(&self) -> u16 {
        self.current_id
    }

    pub fn can_prev(&self) -> bool {
        self.current_id > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_id < self.max_id
    }

    /// Target of a transition taken from `from`, or `None` when that arrow
    /// is disabled. `from` is the in-flight target when one exists, so rapid
    /// presses keep walking instead of re-requesting the same id.
    pub fn step_from(&self, from: u16, direction: Direction) -> Option<u16> {
        match direction {
            Direction::Prev if from > 1 => Some(from - 1),
            Direction::Next if from < self.max_id => Some(from + 1),
            _ => None,
        }
    }

    pub fn step(&self, direction: Direction) -> Option<u16> {
        self.step_from(self.current_id, direction)
    }

    /// Commits a successfully loaded id. Ids outside the domain are refused.
    pub fn commit(&mut self, id: u16) -> bool {
        if id == 0 || id > self.max_id {
            return false;
        }
        self.current_id = id;
        true
    }
}
