//! Paint program: the device-independent output of pagination.
//!
//! Coordinates use a top-left origin with `y` growing downward, in points.
//! The PDF writer flips the axis when it materializes a page.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        font: FontSpec,
    },
    Rule {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
    /// The profile picture; `(x, y)` is its top-left corner.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaintPage {
    pub ops: Vec<DrawOp>,
}

impl PaintPage {
    /// Text of every text op, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintProgram {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<PaintPage>,
    pub file_name: String,
}

/// Download name derived from the contact name.
///
/// Whitespace runs collapse to `_`; characters invalid in file names become `_`.
pub fn export_file_name(name: &str) -> String {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| {
                    if c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
                        '_'
                    } else {
                        c
                    }
                })
                .collect()
        })
        .collect();

    if words.is_empty() {
        "Untitled_Resume.pdf".to_string()
    } else {
        format!("{}_Resume.pdf", words.join("_"))
    }
}
