//! Presenter - Turns appearance and camera changes into data pushes
//!
//! Owns the [`DataMode`] selector. Every refresh reads the dataset for the
//! current mode, pushes it to the [`Presentable`] target and toggles the mode,
//! so consecutive refreshes alternate between the two stub datasets.
//!
//! The mode is observable through [`Presenter::watch_mode`].
//!
//! The presenter holds no engine resources. The render target is passed in
//! on each call rather than stored as a back-reference.

use std::sync::mpsc::Receiver;

use tracing::debug;

use super::provider::DataProvider;
use crate::state::Watch;
use crate::types::{DataMode, Location, Viewport};

/// Receiver of presenter output (implemented by the surface).
pub trait Presentable {
    /// A single location is ready; the engine may need restarting.
    fn user_location_did_update(&mut self, location: Location);

    /// Replace the displayed locations.
    fn users_location_did_change(&mut self, locations: &[Location]);
}

pub struct Presenter<P: DataProvider> {
    provider: P,
    mode: Watch<DataMode>,
    home: Location,
    refreshes: u64,
}

impl<P: DataProvider> Presenter<P> {
    pub fn new(provider: P, home: Location) -> Self {
        Self {
            provider,
            mode: Watch::new(DataMode::ModeA),
            home,
            refreshes: 0,
        }
    }

    /// The display became visible after authentication.
    ///
    /// Pushes the home location, then the current dataset.
    pub fn on_appear<T: Presentable + ?Sized>(&mut self, target: &mut T) -> DataMode {
        target.user_location_did_update(self.home);
        self.refresh(target)
    }

    /// The camera stopped moving. Viewport bounds are logged, not used.
    pub fn on_camera_changed<T: Presentable + ?Sized>(&mut self, viewport: &Viewport, target: &mut T) -> DataMode {
        debug!(
            top_left = %viewport.top_left,
            bottom_right = %viewport.bottom_right,
            zoom_level = viewport.zoom_level,
            "camera changed"
        );
        self.refresh(target)
    }

    fn refresh<T: Presentable + ?Sized>(&mut self, target: &mut T) -> DataMode {
        let mode = self.mode.get();
        let locations = self.provider.locations(mode);
        debug!(?mode, count = locations.len(), "pushing locations");
        target.users_location_did_change(&locations);
        self.mode.set(mode.toggle());
        self.refreshes += 1;
        mode
    }

    /// Mode the next refresh will use.
    pub fn data_mode(&self) -> DataMode {
        self.mode.get()
    }

    /// Current data mode, then every toggle.
    pub fn watch_mode(&mut self) -> Receiver<DataMode> {
        self.mode.subscribe()
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    pub fn home(&self) -> Location {
        self.home
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::provider::{StubDataProvider, STUB_DATA_A, STUB_DATA_B};

    #[derive(Default)]
    struct Recorder {
        singles: Vec<Location>,
        batches: Vec<Vec<Location>>,
    }

    impl Presentable for Recorder {
        fn user_location_did_update(&mut self, location: Location) {
            self.singles.push(location);
        }

        fn users_location_did_change(&mut self, locations: &[Location]) {
            self.batches.push(locations.to_vec());
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        calls: usize,
    }

    impl DataProvider for CountingProvider {
        fn locations(&mut self, mode: DataMode) -> Vec<Location> {
            self.calls += 1;
            StubDataProvider.locations(mode)
        }
    }

    fn home() -> Location {
        Location::new(127.108678, 37.40198)
    }

    fn viewport() -> Viewport {
        Viewport::new(Location::new(127.097, 37.426), Location::new(127.122, 37.383), 14)
    }

    #[test]
    fn test_appear_pushes_home_then_dataset() {
        let mut presenter = Presenter::new(StubDataProvider, home());
        let mut target = Recorder::default();

        assert_eq!(presenter.on_appear(&mut target), DataMode::ModeA);
        assert_eq!(target.singles, vec![home()]);
        assert_eq!(target.batches, vec![STUB_DATA_A.to_vec()]);
        assert_eq!(presenter.data_mode(), DataMode::ModeB);
    }

    #[test]
    fn test_appear_then_two_camera_changes_alternate() {
        let mut presenter = Presenter::new(StubDataProvider, home());
        let mut target = Recorder::default();

        let modes = [
            presenter.on_appear(&mut target),
            presenter.on_camera_changed(&viewport(), &mut target),
            presenter.on_camera_changed(&viewport(), &mut target),
        ];

        assert_eq!(modes, [DataMode::ModeA, DataMode::ModeB, DataMode::ModeA]);
        assert_eq!(
            target.batches,
            vec![STUB_DATA_A.to_vec(), STUB_DATA_B.to_vec(), STUB_DATA_A.to_vec()]
        );
        assert_eq!(presenter.refresh_count(), 3);
    }

    #[test]
    fn test_camera_change_ignores_bounds() {
        let mut presenter = Presenter::new(CountingProvider::default(), home());
        let mut target = Recorder::default();

        let far_away = Viewport::new(Location::new(0.0, 0.0), Location::new(0.1, -0.1), 3);
        for viewport in [viewport(), far_away, viewport()] {
            presenter.on_camera_changed(&viewport, &mut target);
        }

        assert_eq!(presenter.provider().calls, 3);
        assert_eq!(target.batches.len(), 3);
        assert!(target.singles.is_empty());
    }

    #[test]
    fn test_mode_watch_tracks_toggles() {
        let mut presenter = Presenter::new(StubDataProvider, home());
        let mode = presenter.watch_mode();
        let mut target = Recorder::default();

        presenter.on_camera_changed(&viewport(), &mut target);
        presenter.on_camera_changed(&viewport(), &mut target);
        assert_eq!(
            mode.try_iter().collect::<Vec<_>>(),
            vec![DataMode::ModeA, DataMode::ModeB, DataMode::ModeA]
        );
    }
}
