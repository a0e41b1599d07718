//! Text cleanup pipeline for rendered output.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Unicode NFC normalization and whitespace only
    Minimal,
    /// Also strips vendor glyphs and collapses blank lines
    #[default]
    Standard,
}

impl std::str::FromStr for CleanupPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(CleanupPreset::Minimal),
            "standard" => Ok(CleanupPreset::Standard),
            other => Err(format!("unknown cleanup preset: {other}")),
        }
    }
}

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Remove Private Use Area characters (HWP stores vendor symbols there)
    pub remove_pua: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove control characters other than tab and newline
    pub remove_control_chars: bool,

    /// Collapse runs of spaces and strip trailing whitespace
    pub normalize_whitespace: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,

    /// Leave YAML frontmatter untouched
    pub preserve_frontmatter: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            remove_pua: false,
            remove_replacement_char: false,
            remove_control_chars: false,
            normalize_whitespace: true,
            max_consecutive_newlines: 0,
            preserve_frontmatter: true,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            remove_pua: true,
            remove_replacement_char: true,
            remove_control_chars: true,
            normalize_whitespace: true,
            max_consecutive_newlines: 2,
            preserve_frontmatter: true,
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
    spaces: Regex,
    newlines: Option<Regex>,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        let spaces = Regex::new(r"[ \u{3000}]{3,}").expect("valid whitespace pattern");
        let newlines = (options.max_consecutive_newlines > 0).then(|| {
            let pattern = format!(r"\n{{{},}}", options.max_consecutive_newlines as usize + 1);
            Regex::new(&pattern).expect("valid newline pattern")
        });
        Self {
            options,
            spaces,
            newlines,
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let frontmatter = if self.options.preserve_frontmatter {
            split_frontmatter(text)
        } else {
            None
        };

        match frontmatter {
            Some((fm, content)) => format!("{}\n{}", fm, self.process_content(content)),
            None => self.process_content(text),
        }
    }

    fn process_content(&self, text: &str) -> String {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.remove_pua
            || self.options.remove_replacement_char
            || self.options.remove_control_chars
        {
            result = result.chars().filter(|&c| self.keep_char(c)).collect();
        }

        if self.options.normalize_whitespace {
            result = self.normalize_whitespace(&result);
        }

        if let Some(ref newlines) = self.newlines {
            let replacement = "\n".repeat(self.options.max_consecutive_newlines as usize);
            result = newlines.replace_all(&result, replacement.as_str()).into_owned();
        }

        result.trim().to_string()
    }

    fn keep_char(&self, c: char) -> bool {
        if self.options.remove_pua && is_private_use(c) {
            return false;
        }
        if self.options.remove_replacement_char && c == '\u{FFFD}' {
            return false;
        }
        if self.options.remove_control_chars && c.is_control() && c != '\n' && c != '\t' {
            return false;
        }
        true
    }

    fn normalize_whitespace(&self, text: &str) -> String {
        text.lines()
            .map(|line| {
                // Exactly two trailing spaces are a Markdown hard line break.
                let hard_break =
                    line.ends_with("  ") && !line.ends_with("   ") && !line.trim().is_empty();
                let collapsed = self.spaces.replace_all(line.trim_end(), "  ");
                if hard_break {
                    format!("{collapsed}  ")
                } else {
                    collapsed.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn is_private_use(c: char) -> bool {
    let code = c as u32;
    (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}

fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let stripped = text.strip_prefix("---\n")?;
    let end = stripped.find("\n---\n")?;
    let split = 4 + end + 5;
    Some((&text[..split], &text[split..]))
}
