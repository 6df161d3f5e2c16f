use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node slot in the tree's arena.
///
/// Stored off-by-one in a `NonZero` so `Option<Handle>` child links cost nothing extra.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Largest slot index a handle can address.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// Returns the handle for `index`, or `None` once the handle space is exhausted.
    #[inline]
    pub(crate) fn try_from_index(index: usize) -> Option<Self> {
        let raw = RawHandle::try_from(index.checked_add(1)?).ok()?;
        NonZero::new(raw).map(Self)
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Child links are `Option<Handle>`; they must stay as small as the raw index.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    fn handle_space_is_bounded() {
        assert!(Handle::try_from_index(Handle::MAX).is_some());
        assert!(Handle::try_from_index(Handle::MAX + 1).is_none());
        assert!(Handle::try_from_index(usize::MAX).is_none());
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::MAX) {
            let handle = Handle::try_from_index(index).unwrap();
            prop_assert_eq!(handle.to_index(), index);
        }
    }
}
