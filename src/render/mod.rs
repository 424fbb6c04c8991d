mod draw;
mod layout;
mod properties;
mod terminal;

pub use draw::GridRenderer;
pub use layout::{GridGeometry, SceneLayout, ScreenPosition};
pub use properties::WindowSize;
pub use terminal::{TerminalError, TerminalGuard};
