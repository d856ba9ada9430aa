//! HTML serialization of the view tree.
//!
//! Produces a fragment mirroring the tree structure one-to-one: the only
//! unescaped content is item body HTML, which has already been through the
//! sanitizing pipeline by construction.

use crate::view::{BoardView, GroupView, ItemView};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

const EMPTY_STATE: &str = r#"<div class="empty-state">No results yet</div>"#;

const GROUP_CARET: &str = r#"<svg viewBox="0 0 24 24"><path d="M6 9l6 6 6-6"/></svg>"#;
const ITEM_CARET: &str = r#"<svg viewBox="0 0 24 24"><path d="M9 6l6 6-6 6"/></svg>"#;

/// Renders the whole board. An empty view renders the placeholder instead of
/// the grouped list.
pub fn render(view: &BoardView) -> String {
    if view.is_empty() {
        return EMPTY_STATE.to_string();
    }

    let mut out = String::from("<div class=\"board\">\n");
    for group in &view.groups {
        render_group(&mut out, group);
    }
    out.push_str("</div>\n");
    out
}

fn render_group(out: &mut String, group: &GroupView) {
    let collapsed = if group.collapsed { " collapsed" } else { "" };
    let _ = write!(
        out,
        "<section class=\"group{}\" data-group=\"{}\">\n\
         <header class=\"group-header\">{}<span>Group: {}</span></header>\n\
         <div class=\"items{}\">\n",
        collapsed,
        encode_double_quoted_attribute(&group.name),
        GROUP_CARET,
        encode_text(&group.name),
        collapsed,
    );
    for item in &group.items {
        render_item(out, item);
    }
    out.push_str("</div>\n</section>\n");
}

fn render_item(out: &mut String, item: &ItemView) {
    let open = if item.expanded { " open" } else { "" };
    let hidden = if item.expanded { "" } else { " hidden" };
    let _ = write!(
        out,
        "<article class=\"item{}\" data-key=\"{}\">\n\
         <div class=\"item-head\">\
         <span class=\"color-dot\" style=\"background-color:{}\"></span>\
         <div class=\"item-main\">\
         <div class=\"item-title\">{}</div>\
         <div class=\"item-summary\">{}</div>\
         </div>\
         <span class=\"item-caret\">{}</span>\
         </div>\n\
         <div class=\"content-body{}\"><div class=\"content-body-inner\">{}</div></div>\n\
         </article>\n",
        open,
        encode_double_quoted_attribute(item.key.as_str()),
        item.color,
        encode_text(&item.title),
        encode_text(&item.preview),
        ITEM_CARET,
        hidden,
        item.body.to_html(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::Reconciler;
    use crate::view::build_view;
    use board_protocol::ResultRecord;

    fn record(group: &str, title: &str, content: &str) -> ResultRecord {
        ResultRecord {
            group: group.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_view_renders_placeholder() {
        let html = render(&build_view(&[], &Reconciler::new()));
        assert!(html.contains("empty-state"));
        assert!(!html.contains("class=\"board\""));
    }

    #[test]
    fn groups_render_in_partition_order() {
        let records = vec![
            record("error", "e", "c"),
            record("info", "i", "c"),
            record("warning", "w", "c"),
        ];
        let html = render(&build_view(&records, &Reconciler::new()));
        let info = html.find("data-group=\"info\"").unwrap();
        let warning = html.find("data-group=\"warning\"").unwrap();
        let error = html.find("data-group=\"error\"").unwrap();
        assert!(info < warning && warning < error);
    }

    #[test]
    fn titles_are_escaped() {
        let records = vec![record("info", "<script>bad</script>", "c")];
        let html = render(&build_view(&records, &Reconciler::new()));
        assert!(!html.contains("<script>bad"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn expanded_item_has_visible_body() {
        let mut state = Reconciler::new();
        let records = vec![record("info", "t", "c")];
        let closed = render(&build_view(&records, &state));
        assert!(closed.contains("content-body hidden"));

        state.toggle_item(&crate::key::ItemKey::derive("t", "c"));
        let open = render(&build_view(&records, &state));
        assert!(open.contains("class=\"item open\""));
        assert!(!open.contains("content-body hidden"));
    }

    #[test]
    fn collapsed_group_is_marked() {
        let mut state = Reconciler::new();
        state.toggle_group("info");
        let html = render(&build_view(&[record("info", "t", "c")], &state));
        assert!(html.contains("class=\"group collapsed\""));
        assert!(html.contains("class=\"items collapsed\""));
    }

    #[test]
    fn default_swatch_when_no_color() {
        let html = render(&build_view(&[record("info", "t", "c")], &Reconciler::new()));
        assert!(html.contains("background-color:#9aa7b1"));
    }
}
