mod color;
mod frame;
mod wave;

pub use color::{hsl_to_rgb, Color, ColorError, Hsla};
pub use frame::{CellFill, Frame};
pub use wave::{Direction, Tick, WaveAnimator, WaveParameters, WaveSnapshot};
