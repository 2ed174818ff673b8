//! Selections

use std::collections::BTreeSet;

use crate::items::ItemId;

/// The set of item identifiers the user currently intends to buy.
///
/// Set semantics: toggling an item twice restores the prior state, and
/// iteration is always in ascending identifier order, which makes the
/// encoded form canonical (re-encoding a decoded selection is byte-stable).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ItemId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from identifiers.
    pub fn from_ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Flip membership of one identifier. Returns `true` if the item is
    /// selected after the toggle.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Add an identifier. Adding an already-selected item is a no-op.
    pub fn insert(&mut self, id: ItemId) {
        self.ids.insert(id);
    }

    /// Remove an identifier if present.
    pub fn remove(&mut self, id: ItemId) {
        self.ids.remove(&id);
    }

    /// Whether the identifier is selected.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Drop every identifier the predicate rejects.
    pub fn retain(&mut self, keep: impl FnMut(&ItemId) -> bool) {
        self.ids.retain(keep);
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Iterate over identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids.iter().copied()
    }

    /// Get the number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Encode as a comma-joined ascending identifier list.
    ///
    /// The empty selection encodes as the empty string.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();

        for (idx, id) in self.iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }

            out.push_str(&id.to_string());
        }

        out
    }

    /// Decode a comma-joined identifier list.
    ///
    /// Deliberately lenient: share links are user-facing and may be
    /// hand-edited or truncated by messaging apps. Malformed tokens
    /// (non-integer, empty) are skipped; a fully unparseable string yields
    /// the empty selection rather than an error.
    #[must_use]
    pub fn decode(encoded: &str) -> Self {
        let ids = encoded
            .split(',')
            .filter_map(|token| token.trim().parse::<u32>().ok().map(ItemId))
            .collect();

        Self { ids }
    }
}

impl FromIterator<ItemId> for Selection {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_prior_state() {
        let mut selection = Selection::from_ids([ItemId(1), ItemId(5)]);
        let before = selection.clone();

        assert!(selection.toggle(ItemId(3)));
        assert!(!selection.toggle(ItemId(3)));

        assert_eq!(selection, before);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut selection = Selection::new();

        selection.insert(ItemId(2));
        selection.insert(ItemId(2));

        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn encode_is_ascending_and_comma_joined() {
        let selection = Selection::from_ids([ItemId(9), ItemId(1), ItemId(5)]);

        assert_eq!(selection.encode(), "1,5,9");
    }

    #[test]
    fn encode_empty_selection_is_empty_string() {
        assert_eq!(Selection::new().encode(), "");
    }

    #[test]
    fn decode_round_trips_encode() {
        let selection = Selection::from_ids([ItemId(3), ItemId(7), ItemId(11)]);

        assert_eq!(Selection::decode(&selection.encode()), selection);
    }

    #[test]
    fn re_encoding_a_decoded_selection_is_byte_stable() {
        let encoded = Selection::from_ids([ItemId(4), ItemId(2)]).encode();

        assert_eq!(Selection::decode(&encoded).encode(), encoded);
    }

    #[test]
    fn decode_skips_malformed_tokens() {
        let selection = Selection::decode("abc,,3,x");

        assert_eq!(selection, Selection::from_ids([ItemId(3)]));
    }

    #[test]
    fn decode_unparseable_string_yields_empty_selection() {
        assert!(Selection::decode("not a list at all").is_empty());
        assert!(Selection::decode("").is_empty());
    }

    #[test]
    fn decode_tolerates_whitespace_around_tokens() {
        let selection = Selection::decode(" 1 , 2 ,3 ");

        assert_eq!(
            selection,
            Selection::from_ids([ItemId(1), ItemId(2), ItemId(3)])
        );
    }

    #[test]
    fn retain_drops_rejected_identifiers() {
        let mut selection = Selection::from_ids([ItemId(1), ItemId(2), ItemId(3)]);

        selection.retain(|id| id.0 != 2);

        assert_eq!(selection, Selection::from_ids([ItemId(1), ItemId(3)]));
    }

    #[test]
    fn clear_empties_the_selection() {
        let mut selection = Selection::from_ids([ItemId(1)]);

        selection.clear();

        assert!(selection.is_empty());
    }
}
