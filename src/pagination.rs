/// Fixed backend page size. Every offset is a multiple of it.
pub const PAGE_SIZE: u64 = 10;

/// Highest page boundary representable as a `u64`.
pub const LAST_OFFSET: u64 = u64::MAX - u64::MAX % PAGE_SIZE;

/// Offset of the following page. There is no page after `LAST_OFFSET`, so
/// it stays put there instead of landing off a page boundary.
/// `previous(next(offset)) == offset` for every aligned offset below it.
pub fn next(offset: u64) -> u64 {
    offset.checked_add(PAGE_SIZE).unwrap_or(offset)
}

pub fn previous(offset: u64) -> u64 {
    offset.saturating_sub(PAGE_SIZE)
}

pub fn can_go_previous(offset: u64) -> bool {
    offset > 0
}

/// Floors an arbitrary offset onto a page boundary.
pub fn align(offset: u64) -> u64 {
    offset - offset % PAGE_SIZE
}

/// Whether "next" stays clickable past the backend's `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NextPolicy {
    /// Always offer "next", whatever the total says.
    #[default]
    Always,
    /// Disable "next" once `offset + PAGE_SIZE >= total`.
    GuardByTotal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    Enabled(u64),
    Disabled,
}

/// Buttons shown under a result page. `previous` is absent (not disabled) on
/// the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    pub previous: Option<u64>,
    pub next: NextControl,
}

impl PaginationControls {
    pub fn for_page(offset: u64, total: u64, policy: NextPolicy) -> Self {
        let next_offset = next(offset);
        PaginationControls {
            previous: can_go_previous(offset).then(|| previous(offset)),
            next: match policy {
                _ if next_offset == offset => NextControl::Disabled,
                NextPolicy::GuardByTotal if next_offset >= total => NextControl::Disabled,
                _ => NextControl::Enabled(next_offset),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_undoes_next() {
        for page in 0..50u64 {
            let offset = page * PAGE_SIZE;
            assert_eq!(previous(next(offset)), offset);
        }
    }

    #[test]
    fn test_next_stops_at_last_offset() {
        assert_eq!(LAST_OFFSET % PAGE_SIZE, 0);
        assert_eq!(align(u64::MAX), LAST_OFFSET);
        assert_eq!(next(LAST_OFFSET), LAST_OFFSET);

        let before_last = LAST_OFFSET - PAGE_SIZE;
        assert_eq!(next(before_last), LAST_OFFSET);
        assert_eq!(previous(next(before_last)), before_last);

        let controls = PaginationControls::for_page(LAST_OFFSET, u64::MAX, NextPolicy::Always);
        assert_eq!(controls.next, NextControl::Disabled);
        assert_eq!(controls.previous, Some(before_last));
    }

    #[test]
    fn test_can_go_previous() {
        assert!(!can_go_previous(0));
        assert!(can_go_previous(10));
    }

    #[test]
    fn test_previous_clamps_at_zero() {
        assert_eq!(previous(0), 0);
        assert_eq!(previous(10), 0);
        assert_eq!(previous(30), 20);
    }

    #[test]
    fn test_align_floors_to_page_boundary() {
        assert_eq!(align(0), 0);
        assert_eq!(align(9), 0);
        assert_eq!(align(15), 10);
        assert_eq!(align(40), 40);
    }

    #[test]
    fn test_first_page_has_no_previous() {
        let controls = PaginationControls::for_page(0, 100, NextPolicy::Always);
        assert_eq!(controls.previous, None);
        assert_eq!(controls.next, NextControl::Enabled(10));
    }

    #[test]
    fn test_always_policy_ignores_total() {
        let controls = PaginationControls::for_page(20, 25, NextPolicy::Always);
        assert_eq!(controls.previous, Some(10));
        assert_eq!(controls.next, NextControl::Enabled(30));
    }

    #[test]
    fn test_guard_policy_disables_next_on_last_page() {
        let last = PaginationControls::for_page(20, 25, NextPolicy::GuardByTotal);
        assert_eq!(last.next, NextControl::Disabled);

        let exact = PaginationControls::for_page(20, 30, NextPolicy::GuardByTotal);
        assert_eq!(exact.next, NextControl::Disabled);

        let more = PaginationControls::for_page(20, 31, NextPolicy::GuardByTotal);
        assert_eq!(more.next, NextControl::Enabled(30));
    }
}
