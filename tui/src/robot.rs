//! Robot animation frames.
//!
//! Four frames: the antenna waves left, up, right, then the robot blinks.

use std::num::NonZeroUsize;

/// Animation frames, each exactly [`FRAME_HEIGHT`] lines
pub const FRAMES: [&str; 4] = [
    "  \\ /\n [o_o]\n /| |\\\n /   \\",
    "  | |\n [o_o]\n /| |\\\n /   \\",
    "  / \\\n [o_o]\n /| |\\\n /   \\",
    "  | |\n [-_-]\n /| |\\\n /   \\",
];

/// Lines per frame
pub const FRAME_HEIGHT: u16 = 4;

/// Number of frames in the cycle
pub const FRAME_COUNT: NonZeroUsize = match NonZeroUsize::new(FRAMES.len()) {
    Some(count) => count,
    None => panic!("robot needs at least one frame"),
};

/// Frame for `index`, wrapping around the cycle
#[must_use]
pub fn frame(index: usize) -> &'static str {
    FRAMES[index % FRAMES.len()]
}
