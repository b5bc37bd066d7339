//! Wrapped-line layout for the title banner.
//!
//! Glyph rasterization happens at the asset boundary; this module only
//! decides where lines break, using a fixed per-character advance estimate.

/// Greedy word wrap of `text` into lines no wider than `max_width_px`,
/// assuming `advance_px` horizontal pixels per character.
///
/// Words longer than a whole line are hard-split rather than overflowing.
pub fn wrap(text: &str, max_width_px: u32, advance_px: u32) -> Vec<String> {
    let max_chars = (max_width_px / advance_px.max(1)).max(1) as usize;
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        // Hard-split words that can never fit on one line.
        while word.chars().count() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        if word.is_empty() {
            continue;
        }

        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Pixel width of a line under the same advance estimate used by [`wrap`].
pub fn line_width_px(line: &str, advance_px: u32) -> u32 {
    line.chars().count() as u32 * advance_px
}
