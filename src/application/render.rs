//! Tree diagram rendering
//!
//! Converts a `TreeDocument` into a `termtree` diagram. The detailed style
//! is the editing view; the compact style is the read-only view showing
//! names only.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{generation_label, wealth_indicator, TreeDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    #[default]
    Detailed,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub style: RenderStyle,
    /// Append member ids so they can be used for id-based edits.
    pub show_ids: bool,
}

/// Produces a displayable view of a tree.
pub trait RenderAdapter {
    fn render(&self, tree: &TreeDocument) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct TermTreeRenderer {
    options: RenderOptions,
}

impl TermTreeRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn compact() -> Self {
        Self::new(RenderOptions {
            style: RenderStyle::Compact,
            show_ids: false,
        })
    }

    pub fn to_tree(&self, member: &TreeDocument) -> Tree<String> {
        let leaves: Vec<_> = member.children.iter().map(|c| self.to_tree(c)).collect();
        Tree::new(self.label(member)).with_leaves(leaves)
    }

    /// Single-line description of one member.
    pub fn label(&self, member: &TreeDocument) -> String {
        if self.options.style == RenderStyle::Compact {
            return member.name.clone();
        }

        let attrs = &member.attributes;
        let mut label = format!("{} ({})", member.name, generation_label(attrs.rank));
        if !attrs.spouse.is_empty() {
            label.push_str(&format!(" ⚭ {}", attrs.spouse));
        } else if attrs.married {
            label.push_str(" ⚭");
        }
        if !attrs.birth.is_empty() {
            label.push_str(&format!(" *{}", attrs.birth));
        }
        label.push(' ');
        label.push_str(&wealth_indicator(attrs.wealth));
        if self.options.show_ids {
            label.push_str(&format!(" [{}]", member.id));
        }
        label
    }
}

impl RenderAdapter for TermTreeRenderer {
    #[instrument(level = "trace", skip_all)]
    fn render(&self, tree: &TreeDocument) -> String {
        self.to_tree(tree).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{add_member, MemberDraft, MemberRef, Wealth};

    fn family() -> TreeDocument {
        let draft = MemberDraft::new("Alice")
            .unwrap()
            .married(true)
            .spouse("Bob")
            .wealth(Wealth::new(4).unwrap())
            .birth("1970-05-01")
            .unwrap();
        add_member(&TreeDocument::default(), &MemberRef::by_name("Root Family"), &draft).tree
    }

    #[test]
    fn given_detailed_style_when_rendering_then_shows_attributes() {
        let out = TermTreeRenderer::default().render(&family());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "Root Family (1st Generation) $$$");
        assert!(lines[1].ends_with("Alice (2nd Generation) ⚭ Bob *1970-05-01 $$$$"));
    }

    #[test]
    fn given_compact_style_when_rendering_then_names_only() {
        let out = TermTreeRenderer::compact().render(&family());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "Root Family");
        assert!(lines[1].ends_with("Alice"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn given_show_ids_when_rendering_then_appends_id() {
        let tree = family();
        let renderer = TermTreeRenderer::new(RenderOptions {
            style: RenderStyle::Detailed,
            show_ids: true,
        });
        let out = renderer.render(&tree);
        assert!(out.contains(&format!("[{}]", tree.children[0].id)));
    }
}
