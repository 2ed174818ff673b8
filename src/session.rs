//! Sessions

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::{catalog::Catalog, items::ItemId, selection::Selection};

/// Errors surfaced by session registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A registry operation referenced a saved list that does not exist.
    #[error("No saved list named {0:?}")]
    NotFound(String),

    /// A copy or rename would overwrite a different existing saved list.
    #[error("A saved list named {0:?} already exists")]
    Conflict(String),

    /// A toggle referenced an identifier the catalog does not contain.
    #[error("Item {0} not found in catalog")]
    UnknownItem(ItemId),
}

/// A user gesture applied to session state.
///
/// The display layer is a stateless projection of the session; every
/// mutation comes through here, which keeps the core testable without any
/// UI involvement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Flip membership of one item in the active selection.
    Toggle(ItemId),

    /// Empty the active selection.
    Clear,

    /// Snapshot the active selection under a name, overwriting any
    /// existing entry with that name.
    Save(String),

    /// Replace the active selection with a saved list's items.
    Activate(String),

    /// Duplicate a saved list under a derived name.
    Copy {
        /// Name of the list to duplicate.
        name: String,
        /// Overwrite an existing list under the derived name.
        force: bool,
    },

    /// Rename a saved list.
    Rename {
        /// Current name.
        from: String,
        /// New name.
        to: String,
        /// Overwrite an existing list under the new name.
        force: bool,
    },

    /// Remove a saved list.
    Delete(String),
}

/// Session-scoped mutable state: the active selection plus named saved
/// lists.
///
/// Owned by exactly one logical actor and passed explicitly into every
/// operation; nothing here is process-global, so concurrent sessions never
/// observe each other's state. Share links are derived from the active
/// selection on demand and never cached, so clearing the selection leaves
/// no stale share state behind.
#[derive(Debug, Default)]
pub struct Session {
    active: Selection,
    saved: FxHashMap<String, Selection>,
}

impl Session {
    /// Create a session with an empty active selection and no saved lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session whose active selection was decoded from a share
    /// link, dropping identifiers the catalog does not contain.
    #[must_use]
    pub fn with_selection(catalog: &Catalog<'_>, mut selection: Selection) -> Self {
        selection.retain(|id| catalog.contains(*id));

        Self {
            active: selection,
            saved: FxHashMap::default(),
        }
    }

    /// The active selection.
    #[must_use]
    pub fn active(&self) -> &Selection {
        &self.active
    }

    /// Saved list names, sorted for deterministic listing.
    #[must_use]
    pub fn saved_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.saved.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a saved list by name.
    #[must_use]
    pub fn saved(&self, name: &str) -> Option<&Selection> {
        self.saved.get(name)
    }

    /// Apply one command to the session state.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownItem`]: toggle of an identifier absent from
    ///   the catalog.
    /// - [`SessionError::NotFound`]: activate/copy/rename/delete of a
    ///   missing saved list. The active selection is left unchanged.
    /// - [`SessionError::Conflict`]: copy/rename collision without `force`.
    pub fn apply(&mut self, catalog: &Catalog<'_>, command: Command) -> Result<(), SessionError> {
        match command {
            Command::Toggle(id) => self.toggle(catalog, id),
            Command::Clear => {
                self.clear();
                Ok(())
            }
            Command::Save(name) => {
                self.save(name);
                Ok(())
            }
            Command::Activate(name) => self.activate(catalog, &name),
            Command::Copy { name, force } => self.copy(&name, force),
            Command::Rename { from, to, force } => self.rename(&from, to, force),
            Command::Delete(name) => self.delete(&name),
        }
    }

    /// Flip membership of one item in the active selection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownItem`] if the catalog does not
    /// contain the identifier, which keeps the active selection's
    /// every-id-exists invariant intact.
    pub fn toggle(&mut self, catalog: &Catalog<'_>, id: ItemId) -> Result<(), SessionError> {
        if !catalog.contains(id) {
            return Err(SessionError::UnknownItem(id));
        }

        let selected = self.active.toggle(id);
        debug!(item = %id, selected, "toggled item");

        Ok(())
    }

    /// Empty the active selection.
    pub fn clear(&mut self) {
        self.active.clear();
        debug!("cleared active selection");
    }

    /// Snapshot the active selection under a name, overwriting any existing
    /// entry with that name.
    pub fn save(&mut self, name: impl Into<String>) {
        let name = name.into();

        info!(name = %name, items = self.active.len(), "saved list");
        self.saved.insert(name, self.active.clone());
    }

    /// Replace the active selection with a saved list's items.
    ///
    /// Identifiers no longer present in the catalog are silently dropped;
    /// the catalog may have changed since the list was saved.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if no list has that name; the
    /// active selection is left unchanged.
    pub fn activate(&mut self, catalog: &Catalog<'_>, name: &str) -> Result<(), SessionError> {
        let mut selection = self
            .saved
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(name.to_string()))?;

        selection.retain(|id| catalog.contains(*id));

        info!(name = %name, items = selection.len(), "activated list");
        self.active = selection;

        Ok(())
    }

    /// Duplicate a saved list under `"{name} (Copy)"`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`]: no list has the source name.
    /// - [`SessionError::Conflict`]: the derived name already exists and
    ///   `force` was not set.
    pub fn copy(&mut self, name: &str, force: bool) -> Result<(), SessionError> {
        let source = self
            .saved
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(name.to_string()))?;

        let derived = format!("{name} (Copy)");

        if !force && self.saved.contains_key(&derived) {
            return Err(SessionError::Conflict(derived));
        }

        info!(from = %name, to = %derived, "copied list");
        self.saved.insert(derived, source);

        Ok(())
    }

    /// Rename a saved list. Renaming a list to its own name is a no-op.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`]: no list has the old name.
    /// - [`SessionError::Conflict`]: a different list already holds the new
    ///   name and `force` was not set.
    pub fn rename(
        &mut self,
        from: &str,
        to: impl Into<String>,
        force: bool,
    ) -> Result<(), SessionError> {
        let to = to.into();

        if !self.saved.contains_key(from) {
            return Err(SessionError::NotFound(from.to_string()));
        }

        if to == from {
            return Ok(());
        }

        if !force && self.saved.contains_key(&to) {
            return Err(SessionError::Conflict(to));
        }

        if let Some(list) = self.saved.remove(from) {
            info!(from = %from, to = %to, "renamed list");
            self.saved.insert(to, list);
        }

        Ok(())
    }

    /// Remove a saved list.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if no list has that name.
    pub fn delete(&mut self, name: &str) -> Result<(), SessionError> {
        self.saved
            .remove(name)
            .ok_or_else(|| SessionError::NotFound(name.to_string()))?;

        info!(name = %name, "deleted list");

        Ok(())
    }
}
