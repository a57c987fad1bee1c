//! Picks one product from a shortlist using the model's selection marker.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::product::Product;

/// Literal marker the recommendation prompt asks the model to emit.
pub const SELECTION_MARKER: &str = "SELECTED_PRODUCT_ID:";

static MARKER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\s*SELECTED_PRODUCT_ID:\s*(\d+)\s*").ok());

#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub product: Product,
    pub cleaned_reply: String,
    /// Zero-based index into the candidate list.
    pub index: usize,
}

/// Chooses a candidate from `reply`.
///
/// A marker index is clamped to the last candidate and the marker (with its
/// surrounding whitespace) is removed from the reply. Without a usable marker
/// the first candidate is chosen and the reply is returned untouched.
/// Returns `None` only for an empty candidate list.
pub fn select(candidates: &[Product], reply: &str) -> Option<Selection> {
    let last = candidates.len().checked_sub(1)?;

    let parsed = MARKER_RE.as_ref().and_then(|re| {
        let caps = re.captures(reply)?;
        let whole = caps.get(0)?;
        let idx = match caps.get(1)?.as_str().parse::<usize>() {
            Ok(idx) => idx,
            // Digits only, so the sole failure is a value past usize.
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
            Err(_) => return None,
        };
        Some((idx, whole.start(), whole.end()))
    });

    let (index, cleaned_reply) = match parsed {
        Some((idx, start, end)) => {
            let index = idx.min(last);
            let mut cleaned = String::with_capacity(reply.len());
            cleaned.push_str(&reply[..start]);
            if start > 0 && end < reply.len() {
                cleaned.push_str(joiner(&reply[start..end]));
            }
            cleaned.push_str(&reply[end..]);
            (index, cleaned.trim().to_string())
        }
        None => {
            debug!("no selection marker in reply; defaulting to first candidate");
            (0, reply.to_string())
        }
    };

    Some(Selection {
        product: candidates[index].clone(),
        cleaned_reply,
        index,
    })
}

/// Separator that replaces a marker sitting between two pieces of text.
/// Paragraph breaks around the marker survive as one blank line.
fn joiner(removed: &str) -> &'static str {
    match removed.matches('\n').count() {
        0 => " ",
        1 => "\n",
        _ => "\n\n",
    }
}
