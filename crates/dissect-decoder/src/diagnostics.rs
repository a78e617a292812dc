use std::fmt::Write as _;

pub use dissect_wire::markers::UNKNOWN_BLOCK_LEN;

/// Receiver for the opaque per-player block found by the player scanner.
///
/// The block's layout is not known. Sinks exist so the bytes can be
/// compared across players while the format is being worked out; they
/// are infallible and never affect the decoded result.
pub trait UnknownBlockSink {
    /// Record one player's block.
    fn push(&mut self, username: &str, block: &[u8; UNKNOWN_BLOCK_LEN]);

    /// Called once after the last identity record.
    fn flush(&mut self);
}

/// Sink that ignores everything. Used when the caller passes none.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl UnknownBlockSink for NullSink {
    fn push(&mut self, _username: &str, _block: &[u8; UNKNOWN_BLOCK_LEN]) {}

    fn flush(&mut self) {}
}

/// Collects every player's block and, on flush, logs them side by side
/// with a marker row showing which byte positions differ.
///
/// ```text
///   Ash       0a 00 13 ff ...
///   Thermite  0b 00 13 ff ...
///             ^^
/// ```
///
/// Output goes to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct HexComparison {
    rows: Vec<(String, [u8; UNKNOWN_BLOCK_LEN])>,
}

impl HexComparison {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks collected since the last flush.
    #[must_use]
    pub fn rows(&self) -> &[(String, [u8; UNKNOWN_BLOCK_LEN])] {
        &self.rows
    }

    /// Byte positions whose value is not the same for every player.
    #[must_use]
    pub fn differing_positions(&self) -> Vec<usize> {
        let Some((_, first)) = self.rows.first() else {
            return Vec::new();
        };
        (0..UNKNOWN_BLOCK_LEN)
            .filter(|&i| self.rows.iter().any(|(_, row)| row[i] != first[i]))
            .collect()
    }

    /// Render the comparison as text, one line per player plus the
    /// marker line.
    #[must_use]
    pub fn render(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        for (name, row) in &self.rows {
            let spaced = row
                .iter()
                .map(|b| hex::encode([*b]))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, "{name:<width$}  {spaced}");
        }
        let diffs = self.differing_positions();
        let marks: String = (0..UNKNOWN_BLOCK_LEN)
            .map(|i| if diffs.contains(&i) { "^^ " } else { "   " })
            .collect();
        let _ = writeln!(out, "{:<width$}  {}", "", marks.trim_end());
        out
    }
}

impl UnknownBlockSink for HexComparison {
    fn push(&mut self, username: &str, block: &[u8; UNKNOWN_BLOCK_LEN]) {
        self.rows.push((username.to_owned(), *block));
    }

    fn flush(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        tracing::debug!(
            players = self.rows.len(),
            differing = ?self.differing_positions(),
            "unknown block comparison\n{}",
            self.render()
        );
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(fill: u8) -> [u8; UNKNOWN_BLOCK_LEN] {
        [fill; UNKNOWN_BLOCK_LEN]
    }

    #[test]
    fn no_rows_no_differences() {
        assert!(HexComparison::new().differing_positions().is_empty());
    }

    #[test]
    fn finds_differing_positions() {
        let mut cmp = HexComparison::new();
        let mut b = block(0x13);
        cmp.push("Ash", &b);
        b[0] = 0x14;
        b[29] = 0x00;
        cmp.push("Thermite", &b);
        assert_eq!(cmp.differing_positions(), vec![0, 29]);
    }

    #[test]
    fn render_aligns_names_and_marks() {
        let mut cmp = HexComparison::new();
        let mut b = block(0);
        cmp.push("Ash", &b);
        b[1] = 0xFF;
        cmp.push("Thermite", &b);
        let text = cmp.render();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Ash       00 00 00"));
        assert!(lines[1].starts_with("Thermite  00 ff 00"));
        assert_eq!(lines[2].trim(), "^^");
    }

    #[test]
    fn flush_clears_rows() {
        let mut cmp = HexComparison::new();
        cmp.push("Ash", &block(1));
        cmp.flush();
        assert!(cmp.rows().is_empty());
    }
}
