//! Text for the front panel display.

use gpibrs::InstrumentError;

/// Number of characters the display shows.
pub const DISPLAY_WIDTH: usize = 10;

/// Turn text into the form the `D` command expects.
///
/// The display cannot show spaces, they are replaced by `@`. The text is upper-cased and any
/// `X` is then lower-cased again, as an upper-case `X` would execute the command right there.
pub(crate) fn encode_display_text(text: &str) -> Result<String, InstrumentError> {
    if text.chars().count() > DISPLAY_WIDTH {
        return Err(InstrumentError::StringTooLong {
            value: text.to_string(),
            max_len: DISPLAY_WIDTH,
        });
    }
    if !text.is_ascii() {
        return Err(InstrumentError::InvalidArgument(format!(
            "Display text must be ASCII, got: {text}"
        )));
    }
    Ok(text.replace(' ', "@").to_ascii_uppercase().replace('X', "x"))
}

/// Frames to scroll a message through the display from right to left.
///
/// The message is padded with one display width of blanks on both ends, such that it enters
/// from the right on an empty display and leaves it empty again. Each frame is exactly
/// [`DISPLAY_WIDTH`] characters long.
///
/// ```
/// use keithley_dmm::display::scroll_frames;
///
/// let frames: Vec<String> = scroll_frames("HI").collect();
/// assert_eq!(frames.len(), 12);
/// assert_eq!(frames[0], "          ");
/// assert_eq!(frames[10], "HI        ");
/// ```
pub fn scroll_frames(message: &str) -> impl Iterator<Item = String> {
    let pad = " ".repeat(DISPLAY_WIDTH);
    let padded: Vec<char> = format!("{pad}{message}{pad}").chars().collect();
    let count = padded.len() - DISPLAY_WIDTH;
    (0..count).map(move |start| padded[start..start + DISPLAY_WIDTH].iter().collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("", "")]
    #[case("hello", "HELLO")]
    #[case("HELLO X", "HELLO@x")]
    #[case("max x", "MAx@x")]
    #[case("0123456789", "0123456789")]
    #[case(" 1.5 V ", "@1.5@V@")]
    fn test_encode(#[case] text: &str, #[case] exp: &str) {
        assert_eq!(encode_display_text(text).unwrap(), exp);
    }

    #[rstest]
    fn test_encode_too_long() {
        match encode_display_text("01234567890") {
            Err(InstrumentError::StringTooLong { value, max_len }) => {
                assert_eq!(value, "01234567890");
                assert_eq!(max_len, 10);
            }
            _ => panic!("Expected StringTooLong error"),
        }
    }

    #[rstest]
    fn test_encode_non_ascii() {
        assert!(matches!(
            encode_display_text("µV"),
            Err(InstrumentError::InvalidArgument(_))
        ));
    }

    #[rstest]
    fn test_scroll_frames() {
        let frames: Vec<String> = scroll_frames("MAGIC SMOKE").collect();
        assert_eq!(frames.len(), 21);
        assert!(frames.iter().all(|f| f.chars().count() == DISPLAY_WIDTH));
        assert_eq!(frames[1], "         M");
        assert_eq!(frames[10], "MAGIC SMOK");
        assert_eq!(frames[20], "E         ");
    }
}
