//! Board session: loaded data plus the active display settings.
//!
//! The session is the only owner of mutable board state. Data arrives
//! once through [`Session::apply_loaded`]; the two setters persist their
//! value immediately. The board itself is recomputed on demand.

use std::sync::Arc;

use tracing::debug;

use crate::board::{compute_board, Board, Grouping, Sorting};
use crate::error::Result;
use crate::model::Dataset;
use crate::prefs::{PreferenceStore, Preferences};

pub struct Session {
    dataset: Dataset,
    preferences: Preferences,
    store: Arc<dyn PreferenceStore>,
}

impl Session {
    /// Start with an empty board and the stored preferences.
    pub fn open(store: Arc<dyn PreferenceStore>, defaults: Preferences) -> Self {
        let preferences = Preferences::load(store.as_ref(), defaults);
        debug!(
            grouping = %preferences.grouping,
            sorting = %preferences.sorting,
            "session opened"
        );
        Self {
            dataset: Dataset::default(),
            preferences,
            store,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn apply_loaded(&mut self, dataset: Dataset) {
        self.dataset = dataset;
    }

    /// Switch grouping and persist it. The in-memory value changes even
    /// when the write fails.
    pub fn set_grouping(&mut self, grouping: Grouping) -> Result<()> {
        self.preferences.grouping = grouping;
        Preferences::save_grouping(self.store.as_ref(), grouping)
    }

    pub fn set_sorting(&mut self, sorting: Sorting) -> Result<()> {
        self.preferences.sorting = sorting;
        Preferences::save_sorting(self.store.as_ref(), sorting)
    }

    pub fn board(&self) -> Board {
        compute_board(
            &self.dataset.tickets,
            &self.dataset.users,
            self.preferences.grouping,
            self.preferences.sorting,
        )
    }
}
