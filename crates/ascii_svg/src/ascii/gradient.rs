use crate::AsciiSvgError;

/// Densest-first ramp ending in a blank space.
pub const DETAILED_RAMP: &str =
    "@#%&$8BWM*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`. ";

/// Ordered glyph set running from visually densest to blank.
///
/// The last character is the blank terminal; cells that map to it emit nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    pub fn new(chars: impl Into<String>) -> Result<Self, AsciiSvgError> {
        let chars: Vec<char> = chars.into().chars().collect();
        if chars.len() < 2 {
            return Err(AsciiSvgError::RampTooShort(chars.len()));
        }
        Ok(Self { chars })
    }

    pub fn detailed() -> Self {
        Self { chars: DETAILED_RAMP.chars().collect() }
    }

    pub fn standard() -> Self {
        Self { chars: "@%#*+=-:. ".chars().collect() }
    }

    pub fn blocks() -> Self {
        Self { chars: "█▓▒░ ".chars().collect() }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn max_index(&self) -> usize {
        self.chars.len() - 1
    }

    pub fn blank(&self) -> char {
        self.chars[self.max_index()]
    }

    pub fn is_blank(&self, ch: char) -> bool {
        ch == self.blank()
    }

    /// First position of `ch` in the ramp.
    pub fn position(&self, ch: char) -> Option<usize> {
        self.chars.iter().position(|&candidate| candidate == ch)
    }

    pub fn char_at(&self, index: usize) -> char {
        self.chars[index.min(self.max_index())]
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self::detailed()
    }
}
