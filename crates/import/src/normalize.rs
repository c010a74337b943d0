/// A non-empty source line with whitespace runs collapsed to single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    /// 1-based line number in the extracted text.
    pub number: usize,
    pub text: String,
}

impl NormalizedLine {
    pub fn fields(&self) -> Vec<&str> {
        self.text.split(' ').collect()
    }
}

/// Lazy iterator over the normalized lines of a text. Cloning it restarts
/// from the same position, so a fresh call to [`normalized_lines`] always
/// yields the same sequence.
#[derive(Debug, Clone)]
pub struct NormalizedLines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl Iterator for NormalizedLines<'_> {
    type Item = NormalizedLine;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, raw) in self.inner.by_ref() {
            let text = collapse_whitespace(raw);
            if !text.is_empty() {
                return Some(NormalizedLine { number: idx + 1, text });
            }
        }
        None
    }
}

pub fn normalized_lines(text: &str) -> NormalizedLines<'_> {
    NormalizedLines {
        inner: text.lines().enumerate(),
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
