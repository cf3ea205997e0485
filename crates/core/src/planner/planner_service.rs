use std::sync::Arc;

use log::warn;

use super::planner_model::StudyPlan;
use crate::errors::{Error, Result, StorageError};
use crate::storage::{load_versioned, save_versioned, LocalStore};

/// Loads and saves the study plan through a [`LocalStore`].
pub struct PlannerService {
    store: Arc<dyn LocalStore>,
}

impl PlannerService {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// The saved plan, or an empty one.
    ///
    /// An unreadable blob is logged and replaced by an empty plan. A blob
    /// from a newer client is an error so it is not overwritten by accident.
    pub fn load(&self) -> Result<StudyPlan> {
        match load_versioned::<StudyPlan>(self.store.as_ref()) {
            Ok(plan) => Ok(plan.unwrap_or_default()),
            Err(Error::Storage(StorageError::Corrupt { key, message })) => {
                warn!("Discarding unreadable '{}': {}", key, message);
                Ok(StudyPlan::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, plan: &StudyPlan) -> Result<()> {
        save_versioned(self.store.as_ref(), plan)
    }

    /// Loads the plan, applies `edit` and saves the result.
    pub fn update<F, T>(&self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut StudyPlan) -> Result<T>,
    {
        let mut plan = self.load()?;
        let out = edit(&mut plan)?;
        self.save(&plan)?;
        Ok(out)
    }
}
