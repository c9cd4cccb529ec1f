use memchr::memchr_iter;

/// Positions in `index` whose byte equals `b`, in ascending order.
///
/// Static siblings always have distinct first bytes, so a static probe
/// yields at most one position; a wildcard child is looked up directly
/// through its node's `cap_slot` instead of a byte scan.
pub(crate) fn candidates(index: &[u8], b: u8) -> impl Iterator<Item = usize> + '_ {
    memchr_iter(b, index)
}
