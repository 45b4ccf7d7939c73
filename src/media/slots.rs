//! Slot collections for captured media
//!
//! Each capture gets the next slot index. Deleting leaves a tombstone (`None`)
//! at that index so thumbnails keyed by slot stay valid for everything else.

use base64::Engine;
use std::collections::BTreeMap;

pub(crate) type SlotIndex = usize;

/// A media blob encoded as a `data:` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EncodedMedia {
    data_url: String,
}

impl EncodedMedia {
    pub(crate) fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            data_url: format!("data:{};base64,{}", mime, payload),
        }
    }

    /// Concatenate recorder chunks into one blob
    pub(crate) fn from_chunks(mime: &str, chunks: &[Vec<u8>]) -> Self {
        Self::from_bytes(mime, &chunks.concat())
    }

    pub(crate) fn as_data_url(&self) -> &str {
        &self.data_url
    }

    pub(crate) fn mime(&self) -> &str {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(";base64,").next())
            .unwrap_or_default()
    }

    /// Approximate decoded size in bytes
    pub(crate) fn byte_len(&self) -> usize {
        let payload = self.data_url.split(";base64,").nth(1).unwrap_or_default();
        payload.len() / 4 * 3
    }
}

#[derive(Debug, Default)]
pub(crate) struct SlotCollection {
    slots: BTreeMap<SlotIndex, Option<EncodedMedia>>,
    next: SlotIndex,
}

impl SlotCollection {
    /// Append at the next slot index and return it
    pub(crate) fn push(&mut self, media: EncodedMedia) -> SlotIndex {
        let index = self.next;
        self.slots.insert(index, Some(media));
        self.next += 1;
        index
    }

    /// Tombstone a slot; false if it was unknown or already deleted
    pub(crate) fn tombstone(&mut self, index: SlotIndex) -> bool {
        match self.slots.get_mut(&index) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn get(&self, index: SlotIndex) -> Option<&EncodedMedia> {
        self.slots.get(&index).and_then(Option::as_ref)
    }

    /// Live items in capture order
    pub(crate) fn survivors(&self) -> impl Iterator<Item = (SlotIndex, &EncodedMedia)> {
        self.slots
            .iter()
            .filter_map(|(index, slot)| slot.as_ref().map(|media| (*index, media)))
    }

    pub(crate) fn live_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_some()).count()
    }

    /// Slot index the next capture will receive
    #[cfg(test)]
    pub(crate) fn next_index(&self) -> SlotIndex {
        self.next
    }

    /// Drop every item; indices keep counting from where they were
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
