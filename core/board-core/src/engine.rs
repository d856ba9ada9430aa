//! BoardEngine - the entry point tying the channel to the view.
//!
//! Owns the latest valid snapshot, the reconciler, and the current view
//! tree. Snapshot application is latest-wins with no merging; a malformed
//! message changes nothing at all.

use crate::error::{BoardError, Result};
use crate::html;
use crate::key::ItemKey;
use crate::reconciler::Reconciler;
use crate::view::{build_view, BoardView, ClickTarget};
use board_protocol::{parse_snapshot, ResultRecord};

/// Client-agnostic engine for the summary board.
///
/// All mutation happens through the three entry points: snapshot arrival and
/// the two click handlers. Everything else is a read.
#[derive(Debug, Default)]
pub struct BoardEngine {
    reconciler: Reconciler,
    latest: Vec<ResultRecord>,
    view: BoardView,
}

impl BoardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one channel message.
    ///
    /// On decode failure the error is logged and returned, and neither the
    /// latest snapshot nor the view changes; a garbled push never corrupts
    /// or blanks the board.
    pub fn apply_message(&mut self, text: &str) -> Result<()> {
        let records = parse_snapshot(text).map_err(|source| {
            tracing::warn!(error = %source, "Dropping malformed snapshot message");
            BoardError::SnapshotDecode { source }
        })?;
        self.apply_snapshot(records);
        Ok(())
    }

    /// Replaces the latest snapshot and rebuilds the whole view.
    ///
    /// The reconciler is read, never written: expand/collapse state survives
    /// every replacement.
    pub fn apply_snapshot(&mut self, records: Vec<ResultRecord>) {
        tracing::debug!(records = records.len(), "Applying snapshot");
        self.latest = records;
        self.view = build_view(&self.latest, &self.reconciler);
    }

    /// Handles a click inside an item.
    ///
    /// Clicks on interactive sub-elements (links, buttons, form controls,
    /// code blocks) pass through untouched. A head click toggles expansion,
    /// flips every item sharing the key in place, and highlights newly
    /// visible code. Returns the new expanded state for head clicks.
    pub fn handle_item_click(&mut self, key: &ItemKey, target: ClickTarget) -> Option<bool> {
        if !target.toggles_expansion() {
            return None;
        }
        let expanded = self.reconciler.toggle_item(key);
        self.view.set_item_expanded(key, expanded);
        Some(expanded)
    }

    /// Handles a click on a group header. Returns the new collapsed state.
    pub fn handle_group_click(&mut self, name: &str) -> bool {
        let collapsed = self.reconciler.toggle_group(name);
        self.view.set_group_collapsed(name, collapsed);
        collapsed
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn latest(&self) -> &[ResultRecord] {
        &self.latest
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Serializes the current view.
    pub fn render_html(&self) -> String {
        html::render(&self.view)
    }
}
