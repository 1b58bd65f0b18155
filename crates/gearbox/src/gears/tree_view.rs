//! Key/value inspector addressed by dotted paths.
//!
//! `set_value("player.stats.hp", "100")` produces
//!
//! ```text
//! - player
//!   - stats
//!       hp: 100
//! ```
//!
//! Clicking a row that has children collapses or expands it.

use std::collections::BTreeMap;

use gearbox_core::Vec2;
use gearbox_ui::{Color, Rect, UiContext, Window};

use crate::config::TreeViewConfig;
use crate::gear::{Gear, GearConfig, UpdateContext};
use crate::render::{rect_triangles, DrawFrame, OverlayVertex, RenderPass};

#[derive(Debug, Clone)]
struct TreeNode {
    value: Option<String>,
    children: BTreeMap<String, TreeNode>,
    expanded: bool,
}

impl TreeNode {
    const fn new() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
            expanded: true,
        }
    }

    fn find(&self, path: &str) -> Option<&Self> {
        path.split('.')
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut Self> {
        path.split('.')
            .try_fold(self, |node, segment| node.children.get_mut(segment))
    }
}

/// One visible line of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    /// Nesting level, 0 for top-level entries.
    pub depth: usize,
    /// Full dotted path.
    pub path: String,
    /// Rendered text.
    pub text: String,
    /// True if the row can be toggled.
    pub has_children: bool,
}

/// Hierarchical key/value display in its own window.
#[derive(Debug)]
pub struct TreeView {
    config: TreeViewConfig,
    root: TreeNode,
    window: Window,
    rows: Vec<TreeRow>,
    rows_dirty: bool,
    background: Vec<OverlayVertex>,
    title: Rect,
    content: Rect,
}

fn valid_path(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(|segment| !segment.is_empty())
}

impl TreeView {
    /// Creates the view and registers its window.
    pub fn new(ui: &mut UiContext, config: TreeViewConfig) -> Self {
        let window = Window::new(ui, "Tree", config.position, config.size);
        Self {
            config,
            root: TreeNode::new(),
            window,
            rows: Vec::new(),
            rows_dirty: true,
            background: Vec::with_capacity(12),
            title: Rect::ZERO,
            content: Rect::ZERO,
        }
    }

    /// Tunables.
    #[must_use]
    pub const fn settings(&self) -> &TreeViewConfig {
        &self.config
    }

    /// The view's window.
    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.window
    }

    /// Sets the value at a dotted path, creating missing parents.
    ///
    /// Empty paths and empty segments are rejected.
    pub fn set_value(&mut self, path: &str, value: impl Into<String>) -> bool {
        if !valid_path(path) {
            return false;
        }
        let node = path.split('.').fold(&mut self.root, |node, segment| {
            node.children
                .entry(segment.to_owned())
                .or_insert_with(TreeNode::new)
        });
        node.value = Some(value.into());
        self.rows_dirty = true;
        true
    }

    /// Value at a dotted path.
    #[must_use]
    pub fn value(&self, path: &str) -> Option<&str> {
        self.root.find(path)?.value.as_deref()
    }

    /// Deletes a path and everything below it.
    pub fn remove(&mut self, path: &str) -> bool {
        if !valid_path(path) {
            return false;
        }
        let (parent, leaf) = match path.rsplit_once('.') {
            Some((parent, leaf)) => (self.root.find_mut(parent), leaf),
            None => (Some(&mut self.root), path),
        };
        let removed = parent.is_some_and(|p| p.children.remove(leaf).is_some());
        self.rows_dirty |= removed;
        removed
    }

    /// Flips a node between expanded and collapsed.
    pub fn toggle(&mut self, path: &str) -> bool {
        match self.root.find_mut(path) {
            Some(node) => {
                node.expanded = !node.expanded;
                self.rows_dirty = true;
                true
            }
            None => false,
        }
    }

    /// Visible rows, rebuilt lazily.
    pub fn rows(&mut self) -> &[TreeRow] {
        if self.rows_dirty {
            self.rebuild_rows();
        }
        &self.rows
    }

    fn rebuild_rows(&mut self) {
        fn walk(node: &TreeNode, prefix: &str, depth: usize, rows: &mut Vec<TreeRow>) {
            for (name, child) in &node.children {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                let has_children = !child.children.is_empty();
                let text = match (has_children, &child.value) {
                    (true, Some(value)) => format!("{} {name}: {value}", marker(child.expanded)),
                    (true, None) => format!("{} {name}", marker(child.expanded)),
                    (false, Some(value)) => format!("  {name}: {value}"),
                    (false, None) => format!("  {name}"),
                };
                rows.push(TreeRow {
                    depth,
                    path: path.clone(),
                    text,
                    has_children,
                });
                if has_children && child.expanded {
                    walk(child, &path, depth + 1, rows);
                }
            }
        }

        fn marker(expanded: bool) -> char {
            if expanded {
                '-'
            } else {
                '+'
            }
        }

        self.rows.clear();
        walk(&self.root, "", 0, &mut self.rows);
        self.rows_dirty = false;
    }

    /// Row under a screen y coordinate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn row_at(&self, content: Rect, y: f32) -> Option<usize> {
        let offset = y - content.y;
        if offset < 0.0 || offset >= content.height {
            return None;
        }
        let index = (offset / self.config.row_height) as usize;
        (index < self.rows.len()).then_some(index)
    }
}

impl Gear for TreeView {
    fn name(&self) -> &str {
        "tree_view"
    }

    fn config(&self) -> &GearConfig {
        &self.config.gear
    }

    fn config_mut(&mut self) -> &mut GearConfig {
        &mut self.config.gear
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        let response = self.window.update(ctx.ui);
        if self.rows_dirty {
            self.rebuild_rows();
        }
        if response.clicked && !response.title_clicked {
            let content = self.window.content_rect(ctx.ui);
            if let Some(index) = self.row_at(content, ctx.pointer.position.y) {
                if self.rows[index].has_children {
                    let path = self.rows[index].path.clone();
                    self.toggle(&path);
                    self.rebuild_rows();
                }
            }
        }

        self.title = self.window.title_rect(ctx.ui);
        self.content = self.window.content_rect(ctx.ui);
        self.background.clear();
        if self.window.is_visible() {
            self.background
                .extend_from_slice(&rect_triangles(self.window.rect(ctx.ui), Color::PANEL));
            self.background
                .extend_from_slice(&rect_triangles(self.title, Color::TITLE_BAR));
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw(&mut self, frame: &mut DrawFrame<'_>) {
        match frame.pass() {
            RenderPass::UiBox => frame.triangles(&self.background),
            RenderPass::Sprite => {
                if !self.window.is_visible() {
                    return;
                }
                let title = self.title;
                frame.text(self.window.title(), Vec2::new(title.x + 4.0, title.y + 1.0), Color::WHITE);

                let content = self.content;
                let row_height = self.config.row_height;
                for (i, row) in self.rows.iter().enumerate() {
                    let y = content.y + row_height * i as f32;
                    if y + row_height > content.bottom() {
                        break;
                    }
                    let x = content.x + 4.0 + self.config.indent * row.depth as f32;
                    frame.text(&row.text, Vec2::new(x, y), self.config.text_color);
                }
            }
            RenderPass::ScreenSpace | RenderPass::GameSpace => {}
        }
    }

    fn sync_ui(&mut self, ui: &mut UiContext, shown: bool) {
        if self.window.is_visible() != shown {
            self.window.set_visible(ui, shown);
        }
    }

    fn clear(&mut self) {
        self.root = TreeNode::new();
        self.rows.clear();
        self.rows_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearbox_core::Mat4;
    use gearbox_ui::{MouseRouter, PointerSnapshot};

    fn view(ui: &mut UiContext) -> TreeView {
        TreeView::new(ui, TreeViewConfig::default())
    }

    #[test]
    fn test_set_value_creates_parents() {
        let mut ui = UiContext::new();
        let mut tree = view(&mut ui);

        assert!(tree.set_value("player.stats.hp", "100"));
        assert_eq!(tree.value("player.stats.hp"), Some("100"));
        assert_eq!(tree.value("player.stats"), None);

        let rows: Vec<_> = tree.rows().iter().map(|r| (r.depth, r.text.clone())).collect();
        assert_eq!(
            rows,
            vec![
                (0, "- player".to_owned()),
                (1, "- stats".to_owned()),
                (2, "  hp: 100".to_owned()),
            ]
        );
    }

    #[test]
    fn test_rejects_empty_segments() {
        let mut ui = UiContext::new();
        let mut tree = view(&mut ui);
        assert!(!tree.set_value("", "x"));
        assert!(!tree.set_value("a..b", "x"));
        assert!(tree.rows().is_empty());
    }

    #[test]
    fn test_remove_subtree() {
        let mut ui = UiContext::new();
        let mut tree = view(&mut ui);
        tree.set_value("a.b", "1");
        tree.set_value("a.c", "2");
        tree.set_value("d", "3");

        assert!(tree.remove("a"));
        assert!(!tree.remove("a.b"));
        assert_eq!(tree.rows().len(), 1);
    }

    #[test]
    fn test_toggle_hides_children() {
        let mut ui = UiContext::new();
        let mut tree = view(&mut ui);
        tree.set_value("a.b", "1");

        assert!(tree.toggle("a"));
        let rows = tree.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "+ a");
    }

    #[test]
    fn test_click_on_row_toggles() {
        let mut ui = UiContext::new();
        let mut router = MouseRouter::new();
        let mut tree = view(&mut ui);
        tree.set_value("a.b", "1");

        let content = tree.window().content_rect(&ui);
        let pointer_at = |down| PointerSnapshot::new(content.x + 20.0, content.y + 2.0, down);

        for down in [true, false] {
            router.update(&mut ui, pointer_at(down));
            let mut ctx = UpdateContext {
                ui: &mut ui,
                pointer: pointer_at(down),
                frame: 0,
                elapsed: 0.0,
                viewport: Vec2::new(800.0, 600.0),
                view_projection: Mat4::IDENTITY,
            };
            tree.update(&mut ctx, 0.016);
        }

        assert_eq!(tree.rows().len(), 1);
    }

    #[test]
    fn test_hidden_window_stops_catching_clicks() {
        let mut ui = UiContext::new();
        let mut tree = view(&mut ui);
        let title = tree.window().title_rect(&ui);
        let inside = Vec2::new(title.x + 4.0, title.y + 4.0);
        assert!(!ui.hit_test(inside).is_empty());

        tree.sync_ui(&mut ui, false);
        assert!(ui.hit_test(inside).is_empty());

        tree.sync_ui(&mut ui, true);
        assert!(!ui.hit_test(inside).is_empty());
    }
}
