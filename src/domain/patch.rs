use std::path::PathBuf;

use serde::Serialize;

const FILE_HEADER: &str = "diff --git";
const HUNK_HEADER: &str = "@@";
const NEW_PATH_HEADER: &str = "+++";
const OLD_PATH_HEADER: &str = "---";

/// How a single line of a unified diff contributes to [`PatchStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    FileHeader,
    HunkHeader,
    Added,
    Removed,
    Other,
}

/// Classifies one diff line. Rules are checked in order and the first match wins.
pub fn classify_line(line: &str) -> LineKind {
    if line.starts_with(FILE_HEADER) {
        LineKind::FileHeader
    } else if line.starts_with(HUNK_HEADER) {
        LineKind::HunkHeader
    } else if line.starts_with('+') && !line.starts_with(NEW_PATH_HEADER) {
        LineKind::Added
    } else if line.starts_with('-') && !line.starts_with(OLD_PATH_HEADER) {
        LineKind::Removed
    } else {
        LineKind::Other
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatchStats {
    pub files_changed: u64,
    pub edit_locations: u64,
    pub lines_added: u64,
    pub lines_removed: u64,
}

impl PatchStats {
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self::default();
        for line in split_lines(text) {
            stats.record(classify_line(line));
        }
        stats
    }

    /// Invalid UTF-8 sequences are dropped, so any byte stream yields counts.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
        Self::from_text(&text)
    }

    pub fn record(&mut self, kind: LineKind) {
        match kind {
            LineKind::FileHeader => self.files_changed += 1,
            LineKind::HunkHeader => self.edit_locations += 1,
            LineKind::Added => self.lines_added += 1,
            LineKind::Removed => self.lines_removed += 1,
            LineKind::Other => {}
        }
    }
}

/// Splits on `\n`, `\r\n` and a lone `\r`. Terminators are not part of the yielded line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let (line, tail) = match rest.find(['\r', '\n']) {
            Some(idx) => {
                let terminator = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                (&rest[..idx], &rest[idx + terminator..])
            }
            None => (rest, ""),
        };
        rest = tail;
        Some(line)
    })
}

/// A patch file found under `<root>/<project>/<patches dir>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchLocation {
    pub project: String,
    pub file_name: String,
    pub path: PathBuf,
}

impl PatchLocation {
    pub fn new(project: impl Into<String>, file_name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            project: project.into(),
            file_name: file_name.into(),
            path,
        }
    }

    /// `Lang` + `12.src.patch` gives `Lang-12`.
    pub fn identifier(&self) -> String {
        let stem = self.file_name.split('.').next().unwrap_or_default();
        format!("{}-{}", self.project, stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_zero_counts() {
        assert_eq!(PatchStats::from_text(""), PatchStats::default());
        assert_eq!(PatchStats::from_bytes(&[]), PatchStats::default());
    }

    #[test]
    fn path_headers_are_not_content() {
        let stats = PatchStats::from_text("+++ a/file\n--- b/file\n");
        assert_eq!(stats, PatchStats::default());
    }

    #[test]
    fn counts_single_file_patch() {
        let text = "diff --git a/x b/x\n\
                    index 83db48f..bf269f4 100644\n\
                    --- a/x\n\
                    +++ b/x\n\
                    @@ -1,2 +1,3 @@\n\
                    \x20context\n\
                    +first\n\
                    +second\n\
                    -gone\n";
        assert_eq!(
            PatchStats::from_text(text),
            PatchStats {
                files_changed: 1,
                edit_locations: 1,
                lines_added: 2,
                lines_removed: 1,
            }
        );
    }

    #[test]
    fn bare_triple_markers_are_excluded() {
        assert_eq!(classify_line("+++"), LineKind::Other);
        assert_eq!(classify_line("---"), LineKind::Other);
    }

    #[test]
    fn triple_marker_exclusion_is_a_prefix_match() {
        assert_eq!(classify_line("+++x"), LineKind::Other);
        assert_eq!(classify_line("---x"), LineKind::Other);
        assert_eq!(classify_line("++x"), LineKind::Added);
        assert_eq!(classify_line("--x"), LineKind::Removed);
        assert_eq!(classify_line("+"), LineKind::Added);
        assert_eq!(classify_line("-"), LineKind::Removed);
    }

    #[test]
    fn blank_and_metadata_lines_are_ignored() {
        for line in ["", " ", "index abc..def", "new file mode 100644", "\\ No newline at end of file"] {
            assert_eq!(classify_line(line), LineKind::Other, "line {line:?}");
        }
    }

    #[test]
    fn header_rules_take_priority() {
        assert_eq!(classify_line("diff --git a/+ b/+"), LineKind::FileHeader);
        assert_eq!(classify_line("@@ -1 +1 @@ -removed"), LineKind::HunkHeader);
        assert_eq!(classify_line("diff -u a b"), LineKind::Other);
    }

    #[test]
    fn hunks_before_any_file_header_still_count() {
        let stats = PatchStats::from_text("@@ -1 +1 @@\n@@ -5 +5 @@\n+x\n");
        assert_eq!(stats.files_changed, 0);
        assert_eq!(stats.edit_locations, 2);
        assert_eq!(stats.lines_added, 1);
    }

    #[test]
    fn rename_only_sections_count_as_changed_files() {
        let text = "diff --git a/old b/new\nsimilarity index 100%\nrename from old\nrename to new\n";
        let stats = PatchStats::from_text(text);
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.edit_locations, 0);
    }

    #[test]
    fn crlf_terminators_do_not_affect_classification() {
        let stats = PatchStats::from_text("diff --git a/x b/x\r\n+a\r\n-b\r\n");
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.lines_added, 1);
        assert_eq!(stats.lines_removed, 1);
    }

    #[test]
    fn lone_carriage_return_ends_a_line() {
        let stats = PatchStats::from_text("diff --git a/x b/x\r@@ -1 +1 @@\r-a\r+b\r");
        assert_eq!(
            stats,
            PatchStats {
                files_changed: 1,
                edit_locations: 1,
                lines_added: 1,
                lines_removed: 1,
            }
        );
    }

    #[test]
    fn mixed_terminators_split_like_universal_newlines() {
        let lines: Vec<_> = split_lines("a\r\nb\rc\n\nd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "", "d"]);
        assert_eq!(split_lines("+x\r\n").collect::<Vec<_>>(), vec!["+x"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let bytes = b"diff --git a/x b/x\n+caf\xe9\n-\xff\xfe\n\xc3(\n";
        let stats = PatchStats::from_bytes(bytes);
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.lines_added, 1);
        assert_eq!(stats.lines_removed, 1);
    }

    #[test]
    fn invalid_bytes_are_dropped_before_classification() {
        let stats = PatchStats::from_bytes(b"\xff+foo\n\xfe\xfd-bar\n");
        assert_eq!(stats.lines_added, 1);
        assert_eq!(stats.lines_removed, 1);
    }

    #[test]
    fn genuine_replacement_characters_are_kept() {
        let stats = PatchStats::from_bytes("\u{FFFD}+foo\n".as_bytes());
        assert_eq!(stats.lines_added, 0);
    }

    #[test]
    fn extraction_is_repeatable() {
        let text = "diff --git a/x b/x\n@@ -1 +1 @@\n-a\n+b\n";
        assert_eq!(PatchStats::from_text(text), PatchStats::from_text(text));
    }

    #[test]
    fn identifier_uses_stem_before_first_dot() {
        let location = PatchLocation::new("Lang", "12.src.patch", PathBuf::from("Lang/patches/12.src.patch"));
        assert_eq!(location.identifier(), "Lang-12");
    }
}
