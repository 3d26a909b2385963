//! Heading-based segmentation of a Markdown corpus
//!
//! The scan is a fold over lines: completed sections accumulate in order and
//! at most one section is pending. A line is a boundary only when its `#`
//! markers start at column 0, so inline `#` characters never split a section.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// Callout tags rewritten to a single glyph before segmentation
const CALLOUTS: &[(&str, &str)] = &[
    ("[!NOTE]", "ℹ"),
    ("[!TIP]", "💡"),
    ("[!IMPORTANT]", "❗"),
    ("[!WARNING]", "⚠"),
    ("[!CAUTION]", "🛑"),
];

/// Deepest heading level that can ever act as a boundary
pub const MAX_BOUNDARY_DEPTH: u8 = 3;

/// Segmentation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Headings with at most this many `#` start a new section (1..=3)
    pub max_depth: u8,
    /// Ignore heading-like lines inside fenced code blocks
    pub respect_code_fences: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_BOUNDARY_DEPTH,
            respect_code_fences: true,
        }
    }
}

impl SegmenterConfig {
    /// Only top-level `#` headings split sections
    pub fn depth_one() -> Self {
        Self {
            max_depth: 1,
            ..Self::default()
        }
    }

    /// Set the boundary depth, clamped to 1..=3
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.clamp(1, MAX_BOUNDARY_DEPTH);
        self
    }
}

/// A segmented section before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub title: String,
    pub body: String,
    pub level: u8,
    pub line: usize,
}

/// Section currently collecting body lines
struct Pending<'a> {
    title: &'a str,
    level: u8,
    line: usize,
    body: Vec<&'a str>,
}

impl<'a> Pending<'a> {
    /// Emit the section unless its title or trimmed body is empty
    fn finish(self) -> Option<RawSection> {
        let body = self.body.join("\n");
        let body = body.trim();

        if self.title.is_empty() || body.is_empty() {
            return None;
        }

        Some(RawSection {
            title: self.title.to_string(),
            body: body.to_string(),
            level: self.level,
            line: self.line,
        })
    }
}

/// An open code fence: marker character and run length
#[derive(Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

/// Accumulator threaded through the line fold
struct Scan<'a> {
    config: SegmenterConfig,
    done: Vec<RawSection>,
    pending: Option<Pending<'a>>,
    fence: Option<Fence>,
}

impl<'a> Scan<'a> {
    fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            done: Vec::new(),
            pending: None,
            fence: None,
        }
    }

    fn step(mut self, number: usize, line: &'a str) -> Self {
        if self.config.respect_code_fences {
            if let Some(open) = self.fence {
                if closes_fence(line, open) {
                    self.fence = None;
                }
                self.push_body(line);
                return self;
            }

            if let Some(fence) = opens_fence(line) {
                self.fence = Some(fence);
                self.push_body(line);
                return self;
            }
        }

        match heading(line, self.config.max_depth) {
            Some((level, title)) => {
                self.flush();
                self.pending = Some(Pending {
                    title,
                    level,
                    line: number,
                    body: Vec::new(),
                });
            }
            None => self.push_body(line),
        }

        self
    }

    /// Lines before the first heading have no section and are discarded
    fn push_body(&mut self, line: &'a str) {
        if let Some(pending) = self.pending.as_mut() {
            pending.body.push(line);
        }
    }

    fn flush(&mut self) {
        if let Some(section) = self.pending.take().and_then(Pending::finish) {
            self.done.push(section);
        }
    }

    fn finish(mut self) -> Vec<RawSection> {
        self.flush();
        self.done
    }
}

/// Split a document into sections in document order
///
/// Headings whose trimmed body is empty are dropped, as is any text before
/// the first heading. A document without headings yields no sections.
pub fn segment(text: &str, config: &SegmenterConfig) -> Vec<RawSection> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .fold(Scan::new(*config), |scan, (i, line)| scan.step(i + 1, line))
        .finish()
}

/// Parse a boundary line into its level and title
///
/// Matches 1..=`max_depth` `#` at column 0 followed by whitespace. Returns the
/// title with markers and surrounding whitespace removed (possibly empty).
fn heading(line: &str, max_depth: u8) -> Option<(u8, &str)> {
    let depth = line.bytes().take_while(|&b| b == b'#').count();
    if depth == 0 || depth > usize::from(max_depth) {
        return None;
    }

    let rest = &line[depth..];
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }

    // depth <= MAX_BOUNDARY_DEPTH, so the cast cannot truncate
    Some((depth as u8, rest.trim()))
}

fn opens_fence(line: &str) -> Option<Fence> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }

    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    if len < 3 {
        return None;
    }

    // Backtick fences may not carry backticks in their info string
    if marker == '`' && trimmed[len..].contains('`') {
        return None;
    }

    Some(Fence { marker, len })
}

fn closes_fence(line: &str, open: Fence) -> bool {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return false;
    }

    let len = trimmed.chars().take_while(|c| *c == open.marker).count();
    len >= open.len && trimmed[len * open.marker.len_utf8()..].trim().is_empty()
}

/// Replace bracketed callout tags with single glyphs
///
/// A plain substring substitution; line structure is left untouched.
pub fn normalize_callouts(text: &str) -> String {
    CALLOUTS
        .iter()
        .fold(text.to_string(), |acc, (tag, glyph)| acc.replace(tag, glyph))
}

/// A fenced code block found in a section body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Language identifier (if specified)
    pub language: Option<String>,
    /// Code content
    pub content: String,
}

/// Extract code blocks from Markdown content
pub fn code_blocks(content: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<CodeBlock> = None;

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                current = Some(CodeBlock {
                    language,
                    content: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            Event::Text(text) => {
                if let Some(block) = current.as_mut() {
                    block.content.push_str(&text);
                }
            }
            _ => {}
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(sections: &[RawSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_depth_policy() {
        let text = "# Top\nintro\n## Child\nchild body\n### Leaf\nleaf body\n#### Deep\ndeep body";

        let fine = segment(text, &SegmenterConfig::default());
        assert_eq!(titles(&fine), vec!["Top", "Child", "Leaf"]);
        assert_eq!(fine[2].body, "leaf body\n#### Deep\ndeep body");

        let coarse = segment(text, &SegmenterConfig::depth_one());
        assert_eq!(titles(&coarse), vec!["Top"]);
        assert!(coarse[0].body.contains("## Child"));
        assert!(coarse[0].body.ends_with("deep body"));
    }

    #[test]
    fn test_empty_body_heading_dropped() {
        let sections = segment("# Empty\n\n   \n# Full\ncontent", &SegmenterConfig::default());
        assert_eq!(titles(&sections), vec!["Full"]);
        assert_eq!(sections[0].line, 4);
    }

    #[test]
    fn test_no_headings() {
        assert!(segment("", &SegmenterConfig::default()).is_empty());
        assert!(segment("just text\nmore text", &SegmenterConfig::default()).is_empty());
    }

    #[test]
    fn test_text_before_first_heading_discarded() {
        let sections = segment("preamble\n# A\nbody", &SegmenterConfig::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "body");
    }

    #[test]
    fn test_boundary_requires_column_zero_and_whitespace() {
        let text = "# A\n  # indented\n#hashtag\ntext with `# inline`\n####### many";
        let sections = segment(text, &SegmenterConfig::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body.lines().count(), 4);
    }

    #[test]
    fn test_untitled_heading_discarded() {
        let sections = segment("# A\na\n#   \norphan\n# B\nb", &SegmenterConfig::default());
        assert_eq!(titles(&sections), vec!["A", "B"]);
        assert_eq!(sections[0].body, "a");
    }

    #[test]
    fn test_code_fences_hide_headings() {
        let text = "# Install\n```bash\n# add the package\nnpm i svelte\n```\nafter\n# Next\nx";

        let sections = segment(text, &SegmenterConfig::default());
        assert_eq!(titles(&sections), vec!["Install", "Next"]);
        assert!(sections[0].body.contains("# add the package"));
        assert!(sections[0].body.ends_with("after"));

        let naive = SegmenterConfig {
            respect_code_fences: false,
            ..SegmenterConfig::default()
        };
        let sections = segment(text, &naive);
        assert_eq!(titles(&sections), vec!["Install", "add the package", "Next"]);
    }

    #[test]
    fn test_fence_close_needs_matching_marker() {
        let text = "# A\n````md\n```\n# still code\n````\n# B\nb";
        let sections = segment(text, &SegmenterConfig::default());
        assert_eq!(titles(&sections), vec!["A", "B"]);
    }

    #[test]
    fn test_body_preserved_verbatim() {
        let text = "# Table\n| a | b |\n|---|---|\n|  1 | 2 |\n\n- item\n    - nested";
        let sections = segment(text, &SegmenterConfig::default());
        assert_eq!(
            sections[0].body,
            "| a | b |\n|---|---|\n|  1 | 2 |\n\n- item\n    - nested"
        );
    }

    #[test]
    fn test_sections_partition_lines() {
        let text = "skip\n# One\na\nb\n## Two\nc\n\n### Three\n\n# Four\nd\ne";
        let lines: Vec<&str> = text.lines().collect();
        let sections = segment(text, &SegmenterConfig::default());

        let mut cursor = 0;
        for section in &sections {
            let heading_at = lines[cursor..]
                .iter()
                .position(|l| l.trim_start_matches('#').trim() == section.title)
                .map(|p| p + cursor)
                .unwrap();
            let body_lines: Vec<&str> = section.body.lines().collect();
            let start = heading_at + 1
                + lines[heading_at + 1..]
                    .iter()
                    .position(|l| *l == body_lines[0])
                    .unwrap();
            assert_eq!(&lines[start..start + body_lines.len()], body_lines.as_slice());
            cursor = start + body_lines.len();
        }
        assert_eq!(titles(&sections), vec!["One", "Two", "Four"]);
    }

    #[test]
    fn test_crlf_lines() {
        let sections = segment("# A\r\nbody\r\n", &SegmenterConfig::default());
        assert_eq!(sections[0].title, "A");
        assert_eq!(sections[0].body, "body");
    }

    #[test]
    fn test_normalize_callouts_keeps_lines() {
        let text = "> [!WARNING]\n> careful\n> [!TIP] and [!NOTE]";
        let normalized = normalize_callouts(text);
        assert_eq!(normalized, "> ⚠\n> careful\n> 💡 and ℹ");
        assert_eq!(normalized.lines().count(), text.lines().count());
        assert_eq!(normalize_callouts("[!note]"), "[!note]");
    }

    #[test]
    fn test_with_max_depth_clamps() {
        assert_eq!(SegmenterConfig::default().with_max_depth(0).max_depth, 1);
        assert_eq!(SegmenterConfig::default().with_max_depth(9).max_depth, 3);
    }

    #[test]
    fn test_extract_code_blocks() {
        let content = r#"
Some prose.

```svelte title="App.svelte"
<script>
	let count = $state(0);
</script>
```

```js
export const x = 1;
```
"#;

        let blocks = code_blocks(content);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language.as_deref(), Some("svelte"));
        assert!(blocks[0].content.contains("$state(0)"));
        assert_eq!(blocks[1].language.as_deref(), Some("js"));
        assert_eq!(blocks[1].content, "export const x = 1;\n");
    }
}
