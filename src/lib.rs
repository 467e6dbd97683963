// NES Frontend Library
// Real-time presentation front end for an emulation core

// Public modules
pub mod catalog;
pub mod display;
pub mod emulator;
pub mod input;
pub mod machine;
pub mod session;
pub mod timing;

// Re-export main types for convenience
pub use catalog::{
    AssetFetcher, CatalogEntry, CatalogError, CatalogMenu, DirectoryFetcher, FetchError,
    RomCatalogLoader,
};
pub use display::{FrameBufferPresenter, FrameBufferView, PresentError, WindowConfig};
pub use emulator::{Emulator, FrontendConfig, KeyOutcome, ScreenshotError};
pub use input::InputBridge;
pub use machine::{CoreError, EmulationCore, FrameGeometry, ReferenceCore, Session};
pub use session::SessionManager;
pub use timing::{FrameHandle, FrameRequester, TickOutcome, TimingConfig, TimingScheduler};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that all components can be instantiated
        let core = ReferenceCore::new();
        assert_eq!(core.frame_width(), 256);
        assert_eq!(core.frame_height(), 240);

        let sessions = SessionManager::new(Box::new(core));
        assert_eq!(sessions.geometry(), FrameGeometry::new(256, 240));

        let _scheduler = TimingScheduler::default();
        let _bridge = InputBridge::new();
        let _menu = CatalogMenu::new();
        let _config = FrontendConfig::default();
    }
}
