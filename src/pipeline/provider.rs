//! Data Provider - Locations to display
//!
//! [`StubDataProvider`] serves one of two fixed datasets depending on the
//! [`DataMode`] the presenter asks for. It stands in for a real source and
//! has no state of its own.

use crate::types::{DataMode, Location};

/// Supplies the locations shown for a given data mode.
pub trait DataProvider {
    fn locations(&mut self, mode: DataMode) -> Vec<Location>;
}

pub const STUB_DATA_A: [Location; 3] = [
    Location::new(127.0973, 37.39),
    Location::new(127.108678, 37.40198),
    Location::new(127.110678, 37.41198),
];

pub const STUB_DATA_B: [Location; 4] = [
    Location::new(127.0973, 37.39),
    Location::new(127.108678, 37.40198),
    Location::new(127.100678, 37.6000),
    Location::new(127.122378, 37.42198),
];

/// Alternating two-dataset stub.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubDataProvider;

impl DataProvider for StubDataProvider {
    fn locations(&mut self, mode: DataMode) -> Vec<Location> {
        match mode {
            DataMode::ModeA => STUB_DATA_A.to_vec(),
            DataMode::ModeB => STUB_DATA_B.to_vec(),
        }
    }
}

impl<F> DataProvider for F
where
    F: FnMut(DataMode) -> Vec<Location>,
{
    fn locations(&mut self, mode: DataMode) -> Vec<Location> {
        self(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_datasets() {
        let mut provider = StubDataProvider;
        assert_eq!(provider.locations(DataMode::ModeA).len(), 3);
        assert_eq!(provider.locations(DataMode::ModeB).len(), 4);
        assert_eq!(provider.locations(DataMode::ModeA), STUB_DATA_A.to_vec());
    }

    #[test]
    fn test_closure_provider() {
        let mut calls = 0;
        let mut provider = |mode: DataMode| {
            calls += 1;
            match mode {
                DataMode::ModeA => vec![Location::new(1.0, 1.0)],
                DataMode::ModeB => Vec::new(),
            }
        };
        assert_eq!(provider.locations(DataMode::ModeA).len(), 1);
        assert!(provider.locations(DataMode::ModeB).is_empty());
        drop(provider);
        assert_eq!(calls, 2);
    }
}
