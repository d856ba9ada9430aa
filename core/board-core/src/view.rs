//! Renderable view tree.
//!
//! `build_view` is a pure function of `(snapshot, reconciler)`: every
//! snapshot rebuilds the whole tree, and restored expand/collapse state comes
//! only from the reconciler. Toggles after a build mutate the tree in place;
//! no rebuild is needed for a click.

use crate::groups::partition;
use crate::key::ItemKey;
use crate::markdown::{self, RenderedBody};
use crate::reconciler::Reconciler;
use board_protocol::ResultRecord;
use once_cell::sync::Lazy;
use regex::Regex;

/// Swatch used when a record carries no (or a malformed) color.
pub const DEFAULT_COLOR: &str = "#9aa7b1";

static RE_COLOR_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// One rendered record.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub key: ItemKey,
    pub title: String,
    pub color: String,
    pub preview: String,
    pub expanded: bool,
    pub body: RenderedBody,
}

/// One severity group with its header state.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    pub name: String,
    pub collapsed: bool,
    pub items: Vec<ItemView>,
}

/// The whole visible tree. Empty groups means the empty-state placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardView {
    pub groups: Vec<GroupView>,
}

impl BoardView {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flips every item with this key (duplicate keys share state by
    /// design) and highlights bodies on the transition into expanded.
    pub fn set_item_expanded(&mut self, key: &ItemKey, expanded: bool) {
        for group in &mut self.groups {
            for item in &mut group.items {
                if item.key == *key {
                    item.expanded = expanded;
                    if expanded {
                        markdown::highlight_body(&mut item.body);
                    }
                }
            }
        }
    }

    pub fn set_group_collapsed(&mut self, name: &str, collapsed: bool) {
        for group in &mut self.groups {
            if group.name == name {
                group.collapsed = collapsed;
            }
        }
    }
}

/// Classification of where inside an item a click landed.
///
/// The expand/collapse gesture must not swallow interaction with rendered
/// content, so the embedding UI classifies the click target explicitly
/// instead of relying on event-bubbling quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The item header row (dot, title, preview, caret).
    Head,
    Link,
    Button,
    FormControl,
    CodeBlock,
}

impl ClickTarget {
    pub fn toggles_expansion(&self) -> bool {
        matches!(self, ClickTarget::Head)
    }
}

fn swatch_color(record: &ResultRecord) -> String {
    match &record.color_circle {
        Some(color) if RE_COLOR_HEX.is_match(color) => color.clone(),
        _ => DEFAULT_COLOR.to_string(),
    }
}

fn preview_text(record: &ResultRecord) -> String {
    let summary = record
        .very_short_summary_of_content
        .as_deref()
        .unwrap_or("");
    if summary.is_empty() {
        markdown::to_plain_text(&markdown::preview_source(&record.content))
    } else {
        markdown::to_plain_text(summary)
    }
}

/// Builds the full tree for a snapshot.
///
/// Bodies are sanitized for every item; highlighting runs at build time only
/// for items the reconciler says are expanded, so restored items look
/// exactly as they did before the rebuild without a click.
pub fn build_view(records: &[ResultRecord], state: &Reconciler) -> BoardView {
    let mut groups = Vec::new();

    for bucket in partition(records) {
        let mut items = Vec::new();
        for record in bucket.records {
            let key = ItemKey::derive(&record.title, &record.content);
            let expanded = state.is_expanded(&key);
            let mut body = markdown::render_body(&record.content);
            if expanded {
                markdown::highlight_body(&mut body);
            }
            items.push(ItemView {
                key,
                title: record.title.clone(),
                color: swatch_color(record),
                preview: preview_text(record),
                expanded,
                body,
            });
        }
        groups.push(GroupView {
            name: bucket.name.to_string(),
            collapsed: state.is_group_collapsed(bucket.name),
            items,
        });
    }

    BoardView { groups }
}
