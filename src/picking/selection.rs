use crate::scene::ObjectId;

/// Supplies the object currently under the cursor.
///
/// Queried once per frame before drag evaluation. `None` means "nothing new
/// resolved"; the picking system keeps its previous selection.
pub trait SelectionResolver {
    /// The object under the cursor, if one was resolved this frame.
    fn resolve_selection(&mut self) -> Option<ObjectId>;
}

/// Always resolves to a fixed object. Useful for hosts that select through
/// their own UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelection(pub Option<ObjectId>);

impl SelectionResolver for FixedSelection {
    fn resolve_selection(&mut self) -> Option<ObjectId> {
        self.0
    }
}

/// Flat RGBA8 color identifying an object in the index render target.
///
/// Object `n` is written as `n + 1` packed little-endian into R, G, B with
/// full alpha. Transparent black is background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickColor(pub [u8; 4]);

impl PickColor {
    /// Background (cleared) index color.
    pub const BACKGROUND: Self = Self([0, 0, 0, 0]);

    /// Largest encodable object id.
    pub const MAX_ID: u32 = 0x00FF_FFFE;

    /// Index color for `id`, or `None` if it does not fit in 24 bits.
    #[must_use]
    pub fn encode(id: ObjectId) -> Option<Self> {
        if id.raw() > Self::MAX_ID {
            return None;
        }
        let [r, g, b, _] = (id.raw() + 1).to_le_bytes();
        Some(Self([r, g, b, u8::MAX]))
    }

    /// Decode a pixel read back from the index target.
    ///
    /// Pixels blended with the background (alpha below 255) and the
    /// background decode to `None`. Two objects blended together cannot be
    /// told apart from a third, so multisampled index targets are read at
    /// sample 0 rather than resolved.
    #[must_use]
    pub fn decode(self) -> Option<ObjectId> {
        let [r, g, b, a] = self.0;
        if a != u8::MAX {
            return None;
        }
        let packed = u32::from_le_bytes([r, g, b, 0]);
        packed.checked_sub(1).map(ObjectId::from_raw)
    }

    /// Normalized color for shader uniforms.
    #[must_use]
    pub fn to_f32(self) -> [f32; 4] {
        self.0.map(|c| f32::from(c) / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_known_ids() {
        for raw in [0, 1, 255, 256, 70_000, PickColor::MAX_ID] {
            let id = ObjectId::from_raw(raw);
            let color = PickColor::encode(id);
            assert_eq!(color.and_then(PickColor::decode), Some(id));
        }
    }

    #[test]
    fn first_object_is_dim_red() {
        assert_eq!(
            PickColor::encode(ObjectId::from_raw(0)),
            Some(PickColor([1, 0, 0, 255]))
        );
    }

    #[test]
    fn background_and_blended_pixels_resolve_to_none() {
        assert_eq!(PickColor::BACKGROUND.decode(), None);
        assert_eq!(PickColor([0, 0, 0, 255]).decode(), None);
        assert_eq!(PickColor([1, 0, 0, 128]).decode(), None);
    }

    #[test]
    fn averaged_object_colors_alias_another_object() {
        let a = PickColor::encode(ObjectId::from_raw(0)).unwrap().0;
        let b = PickColor::encode(ObjectId::from_raw(2)).unwrap().0;
        let averaged = PickColor(std::array::from_fn(|i| {
            ((u16::from(a[i]) + u16::from(b[i])) / 2) as u8
        }));
        assert_eq!(averaged.decode(), Some(ObjectId::from_raw(1)));
        // Sample 0 keeps one of the two real objects.
        assert_eq!(PickColor(a).decode(), Some(ObjectId::from_raw(0)));
    }

    #[test]
    fn oversized_id_is_not_encodable() {
        assert_eq!(PickColor::encode(ObjectId::from_raw(0x00FF_FFFF)), None);
    }

    #[test]
    fn fixed_selection_repeats() {
        let mut fixed = FixedSelection(Some(ObjectId::from_raw(3)));
        assert_eq!(fixed.resolve_selection(), Some(ObjectId::from_raw(3)));
        assert_eq!(fixed.resolve_selection(), Some(ObjectId::from_raw(3)));
    }
}
