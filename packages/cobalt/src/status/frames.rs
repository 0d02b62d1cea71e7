/// The classic "busy" frames: `.`, `..`, `...`
pub const BUSY_FRAMES: [&str; 3] = [".", "..", "..."];

/// [`BUSY_FRAMES`] with a message in front.
///
/// ```rust
/// # use pistonite_cobalt as cobalt;
/// assert_eq!(
///     cobalt::status::busy_frames("Loading"),
///     vec!["Loading.", "Loading..", "Loading..."]
/// );
/// ```
pub fn busy_frames(message: &str) -> Vec<String> {
    BUSY_FRAMES
        .iter()
        .map(|dots| format!("{message}{dots}"))
        .collect()
}
