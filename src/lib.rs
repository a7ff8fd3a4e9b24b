// Library root for the uniplat platform layer.
//
// # Threading
//
// Windows, menus and timers are `Rc` handles owned by the UI thread, matching
// the single-threaded event loops of the native toolkits underneath. Only the
// shared input coordination state, the clock and the settings store cross
// threads; they use `parking_lot` locks behind `Arc`.

/// Crate version, for backends and hosts that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod backend;
pub mod callback;
pub mod clock;
pub mod error;
pub mod event;
pub mod input;
pub mod menu;
#[cfg(feature = "native-menus")]
pub mod native_menus;
pub mod platform;
pub mod timer;
pub mod window;

pub use backend::{Backend, NativeEvent, NativeItemId, PopupOutcome, WindowEvent, WindowId};
pub use error::{NativeError, NativeResult};
pub use event::{
    Key, KeyboardEvent, KeyboardEventType, MouseButton, MouseEvent, MouseEventType,
};
pub use input::InputCoordinator;
pub use menu::{Indicator, Menu, MenuBar, MenuEntry, MenuItem};
pub use platform::Platform;
pub use timer::Timer;
pub use window::{Cursor, Window, WindowKind};

pub use uniplat_config;
pub use uniplat_config::{PlatformConfig, SettingsStore};
