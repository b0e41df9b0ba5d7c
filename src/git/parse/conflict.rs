//! git::parse::conflict
//!
//! Conflict marker sections inside a working-tree file.
//!
//! ```text
//! <<<<<<< HEAD            start_line
//! ours
//! ||||||| base            (diff3 / zdiff3 only)
//! base
//! =======
//! theirs
//! >>>>>>> alt             end_line
//! ```
//!
//! Markers are exactly seven characters, alone on the line or followed by a
//! space and a label. Line numbers are 1-based and include the outer
//! markers. A section that never reaches `>>>>>>>` is dropped.

use serde::{Deserialize, Serialize};

/// How a path ended up conflicted, from its two-letter status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStatus {
    BothModified,
    AddedByUs,
    AddedByThem,
    DeletedByUs,
    DeletedByThem,
    BothAdded,
    BothDeleted,
}

impl ConflictStatus {
    /// Map an unmerged `XY` status code.
    pub fn from_code(xy: &str) -> Option<Self> {
        match xy {
            "UU" => Some(ConflictStatus::BothModified),
            "AU" => Some(ConflictStatus::AddedByUs),
            "UA" => Some(ConflictStatus::AddedByThem),
            "DU" => Some(ConflictStatus::DeletedByUs),
            "UD" => Some(ConflictStatus::DeletedByThem),
            "AA" => Some(ConflictStatus::BothAdded),
            "DD" => Some(ConflictStatus::BothDeleted),
            _ => None,
        }
    }
}

/// One `<<<<<<<` ... `>>>>>>>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSection {
    pub start_line: usize,
    pub end_line: usize,
    pub our_content: String,
    pub their_content: String,
    pub base_content: Option<String>,
    /// Set by the caller once `resolution` holds the replacement text
    pub resolved: bool,
    pub resolution: String,
}

/// A conflicted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictFile {
    pub path: String,
    pub status: ConflictStatus,
    pub sections: Vec<ConflictSection>,
    pub raw_content: String,
}

/// How to resolve one conflicted path.
///
/// Exactly one of the flags is meaningful. With neither `use_ours` nor
/// `use_theirs`, a `custom` resolution writes the resolved sections back
/// into the file; otherwise the file is assumed to be already resolved on
/// disk and is only staged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub path: String,
    pub sections: Vec<ConflictSection>,
    pub use_ours: bool,
    pub use_theirs: bool,
    pub custom: bool,
}

impl ConflictResolution {
    /// Take our side of `path`.
    pub fn ours(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            use_ours: true,
            ..Default::default()
        }
    }

    /// Take their side of `path`.
    pub fn theirs(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            use_theirs: true,
            ..Default::default()
        }
    }

    /// Replace each resolved section of `path` with its resolution text.
    pub fn custom(path: impl Into<String>, sections: Vec<ConflictSection>) -> Self {
        Self {
            path: path.into(),
            sections,
            custom: true,
            ..Default::default()
        }
    }

    /// Stage `path` as it is on disk.
    pub fn staged(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Marker {
    Open,
    Base,
    Split,
    Close,
}

fn marker(line: &str) -> Option<Marker> {
    let line = line.trim_end_matches('\r');
    let head = line.get(..7)?;
    let rest = &line[7..];
    if !(rest.is_empty() || rest.starts_with(' ')) {
        return None;
    }
    match head {
        "<<<<<<<" => Some(Marker::Open),
        "|||||||" => Some(Marker::Base),
        "=======" => Some(Marker::Split),
        ">>>>>>>" => Some(Marker::Close),
        _ => None,
    }
}

#[derive(Clone, Copy)]
enum Side {
    Ours,
    Base,
    Theirs,
}

/// Find every complete conflict section in `content`.
pub fn parse_conflict_sections(content: &str) -> Vec<ConflictSection> {
    let mut sections = Vec::new();
    let mut open: Option<(ConflictSection, Side)> = None;

    for (idx, line) in content.lines().enumerate() {
        let number = idx + 1;
        match (marker(line), open.as_mut()) {
            (Some(Marker::Open), _) => {
                // A nested or repeated opener restarts the section
                open = Some((
                    ConflictSection {
                        start_line: number,
                        ..Default::default()
                    },
                    Side::Ours,
                ));
            }
            (Some(Marker::Base), Some((section, side @ Side::Ours))) => {
                section.base_content = Some(String::new());
                *side = Side::Base;
            }
            (Some(Marker::Split), Some((_, side @ (Side::Ours | Side::Base)))) => {
                *side = Side::Theirs;
            }
            (Some(Marker::Close), Some((_, Side::Theirs))) => {
                if let Some((mut section, _)) = open.take() {
                    section.end_line = number;
                    sections.push(section);
                }
            }
            (_, Some((section, side))) => {
                let target = match side {
                    Side::Ours => &mut section.our_content,
                    Side::Theirs => &mut section.their_content,
                    Side::Base => section.base_content.get_or_insert_with(String::new),
                };
                target.push_str(line);
                target.push('\n');
            }
            (_, None) => {}
        }
    }
    sections
}

/// Rewrite `raw` with every resolved section replaced by its resolution.
///
/// Unresolved sections, and sections whose line range overlaps an earlier
/// one, are left as they are.
pub fn apply_resolutions(raw: &str, sections: &[ConflictSection]) -> String {
    let mut resolved: Vec<&ConflictSection> = sections
        .iter()
        .filter(|s| s.resolved && s.start_line >= 1 && s.end_line >= s.start_line)
        .collect();
    resolved.sort_by_key(|s| s.start_line);

    let lines: Vec<&str> = raw.split_inclusive('\n').collect();
    let mut out = String::with_capacity(raw.len());
    let mut next = 1;
    for section in resolved {
        if section.start_line < next || section.end_line > lines.len() {
            continue;
        }
        for line in &lines[next - 1..section.start_line - 1] {
            out.push_str(line);
        }
        out.push_str(&section.resolution);
        next = section.end_line + 1;
    }
    if next <= lines.len() {
        for line in &lines[next - 1..] {
            out.push_str(line);
        }
    }
    out
}
