//! Host flags - what the hosting view has told the surface so far.

bitflags::bitflags! {
    /// Visibility and observer state of the hosting view.
    ///
    /// Combine with bitwise OR: `HostFlags::VISIBLE | HostFlags::OBSERVING`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HostFlags: u8 {
        const NONE = 0;
        /// The display surface is on screen.
        const VISIBLE = 1 << 0;
        /// The initial appearance refresh ran for the current visibility period.
        const APPEARED = 1 << 1;
        /// App foreground/background notifications are being honored.
        const OBSERVING = 1 << 2;
        /// The hosting view is gone; every further event is ignored.
        const TORN_DOWN = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_combine() {
        let mut flags = HostFlags::default();
        assert!(flags.is_empty());

        flags.insert(HostFlags::VISIBLE | HostFlags::OBSERVING);
        assert!(flags.contains(HostFlags::VISIBLE));
        assert!(!flags.contains(HostFlags::APPEARED));

        flags.remove(HostFlags::OBSERVING);
        assert_eq!(flags, HostFlags::VISIBLE);
    }
}
