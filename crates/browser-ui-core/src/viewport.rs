//! Viewport sizing
//!
//! Runs on window resize, on maximize toggles, and once shortly after the
//! transport is set up. Nothing here can change the connection status.

use tracing::debug;

use crate::transport::RemoteTransport;

/// Container bounding box in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whole-pixel size, or `None` while the container has no layout
    #[must_use]
    pub fn target_size(&self) -> Option<(u32, u32)> {
        let width = self.width.round();
        let height = self.height.round();
        if !(width >= 1.0 && height >= 1.0) || !width.is_finite() || !height.is_finite() {
            return None;
        }
        Some((width as u32, height as u32))
    }
}

/// What a sizing pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingOutcome {
    /// Asked the server for an exact desktop size
    RequestedDesktopSize { width: u32, height: u32 },
    /// Fell back to client-side proportional scaling
    ScaledLocally,
    /// Nothing to size yet
    Skipped,
    /// The transport call failed; ignored
    Failed,
}

/// Maximize flag plus the resize algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportSizer {
    maximized: bool,
}

impl ViewportSizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn set_maximized(&mut self, maximized: bool) {
        self.maximized = maximized;
    }

    /// Flip maximize mode and return the new value
    pub fn toggle(&mut self) -> bool {
        self.maximized = !self.maximized;
        self.maximized
    }

    /// One best-effort sizing pass against the live transport
    pub fn apply(&self, transport: &dyn RemoteTransport, bounds: Bounds) -> SizingOutcome {
        let Some((width, height)) = bounds.target_size() else {
            return SizingOutcome::Skipped;
        };

        let (outcome, result) = if self.maximized && transport.supports_desktop_resize() {
            (
                SizingOutcome::RequestedDesktopSize { width, height },
                transport.request_desktop_size(width, height),
            )
        } else {
            (SizingOutcome::ScaledLocally, transport.set_scale_viewport(true))
        };

        match result {
            Ok(()) => outcome,
            Err(err) => {
                debug!(width, height, "ignoring viewport sizing failure: {}", err);
                SizingOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    #[test]
    fn test_target_size_rounds() {
        assert_eq!(Bounds::new(1023.6, 767.4).target_size(), Some((1024, 767)));
        assert_eq!(Bounds::new(0.0, 600.0).target_size(), None);
        assert_eq!(Bounds::new(f64::NAN, 600.0).target_size(), None);
    }

    #[test]
    fn test_windowed_mode_scales_locally() {
        let transport = MockTransport::default();
        let sizer = ViewportSizer::new();

        let outcome = sizer.apply(&transport, Bounds::new(800.0, 600.0));
        assert_eq!(outcome, SizingOutcome::ScaledLocally);
        assert_eq!(transport.calls(), vec!["set_scale_viewport true"]);
    }

    #[test]
    fn test_maximized_requests_exact_size() {
        let transport = MockTransport::default();
        let mut sizer = ViewportSizer::new();
        assert!(sizer.toggle());

        let outcome = sizer.apply(&transport, Bounds::new(1919.5, 1080.2));
        assert_eq!(
            outcome,
            SizingOutcome::RequestedDesktopSize {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(transport.calls(), vec!["request_desktop_size 1920x1080"]);
    }

    #[test]
    fn test_maximized_without_server_resize_falls_back() {
        let transport = MockTransport::default();
        transport.no_desktop_resize.set(true);
        let mut sizer = ViewportSizer::new();
        sizer.set_maximized(true);

        assert_eq!(
            sizer.apply(&transport, Bounds::new(800.0, 600.0)),
            SizingOutcome::ScaledLocally
        );
        assert_eq!(transport.count("request_desktop_size"), 0);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let transport = MockTransport::default();
        transport.fail_resize.set(true);
        let mut sizer = ViewportSizer::new();
        sizer.set_maximized(true);

        assert_eq!(
            sizer.apply(&transport, Bounds::new(800.0, 600.0)),
            SizingOutcome::Failed
        );
    }

    #[test]
    fn test_unlaid_out_container_is_skipped() {
        let transport = MockTransport::default();
        let sizer = ViewportSizer::new();
        assert_eq!(
            sizer.apply(&transport, Bounds::new(0.0, 0.0)),
            SizingOutcome::Skipped
        );
        assert!(transport.calls().is_empty());
    }
}
