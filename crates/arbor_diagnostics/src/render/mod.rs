//! Text tree renderer.
//!
//! Turns a [`DiagnosticsNode`] tree into indented line-art text. All visual
//! decisions come from the node's [`StyleDescriptor`]; the renderer only
//! tracks prefixes, wrapping and truncation.

mod builder;

use std::borrow::Cow;

use arbor_stack::ensure_sufficient_stack;

use crate::node::DiagnosticsNode;
use crate::style::{StyleDescriptor, TreeStyle};
use crate::truncate::{truncate_nodes, LocalProject};
use crate::DiagnosticLevel;

use builder::PrefixedStringBuilder;

/// Wrap width treated as "never wrap".
pub const UNBOUNDED_WIDTH: usize = i32::MAX as usize;

/// Renderer settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Column at which wrappable text is wrapped.
    pub wrap_width: usize,
    /// Minimum width left for property text after deep prefixes.
    pub wrap_width_properties: usize,
    /// Nodes below this level are skipped.
    pub min_level: DiagnosticLevel,
    /// Child/property cap for nodes that allow truncation. `None` is
    /// unlimited.
    pub max_descendants_truncatable_node: Option<usize>,
    /// Project roots preferred when truncating children.
    pub local_project: Option<LocalProject>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            wrap_width: 100,
            wrap_width_properties: 65,
            min_level: DiagnosticLevel::Debug,
            max_descendants_truncatable_node: None,
            local_project: None,
        }
    }
}

impl RenderConfig {
    /// Settings used by `DiagnosticsNode::to_string_deep`: wrap at 65.
    pub fn deep() -> Self {
        Self::default().with_wrap_width(65)
    }

    /// Settings for single-string messages: never wrap.
    ///
    /// Stretched suffixes and footers are written once instead of being
    /// padded to the (unbounded) width.
    pub fn unbounded() -> Self {
        Self::default().with_wrap_width(UNBOUNDED_WIDTH)
    }

    pub fn is_unbounded(&self) -> bool {
        self.wrap_width >= UNBOUNDED_WIDTH
    }

    /// Set both the wrap width and the property wrap width.
    #[must_use]
    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self.wrap_width_properties = width;
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: DiagnosticLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_max_descendants(mut self, max: usize) -> Self {
        self.max_descendants_truncatable_node = Some(max);
        self
    }

    #[must_use]
    pub fn with_local_project(mut self, project: LocalProject) -> Self {
        self.local_project = Some(project);
        self
    }
}

/// Renders node trees as text.
pub struct TextTreeRenderer {
    config: RenderConfig,
}

impl Default for TextTreeRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl TextTreeRenderer {
    pub fn new(config: RenderConfig) -> Self {
        TextTreeRenderer { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `node` as a root. The result ends with exactly one `\n`.
    pub fn render(&self, node: &DiagnosticsNode) -> String {
        let mut out = self.render_with_prefix(node, "", None, None);
        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }

    /// Render `node` with explicit prefixes.
    ///
    /// `prefix_other_lines` defaults to `prefix_line_one`. `parent` is the
    /// style of the enclosing node; `None` marks `node` as the root.
    pub fn render_with_prefix(
        &self,
        node: &DiagnosticsNode,
        prefix_line_one: &str,
        prefix_other_lines: Option<&str>,
        parent: Option<&StyleDescriptor>,
    ) -> String {
        ensure_sufficient_stack(|| {
            self.render_node(node, prefix_line_one, prefix_other_lines, parent)
        })
    }

    fn stretch_width(&self, width: usize) -> usize {
        if self.config.is_unbounded() {
            0
        } else {
            width
        }
    }

    fn render_node(
        &self,
        node: &DiagnosticsNode,
        prefix_line_one: &str,
        prefix_other_lines: Option<&str>,
        parent: Option<&StyleDescriptor>,
    ) -> String {
        let is_single_line =
            node.style().is_single_line() && !parent.is_some_and(|p| p.line_break_properties);
        let mut prefix_line_one = prefix_line_one.to_owned();
        let mut prefix_other_lines = prefix_other_lines.map_or_else(|| prefix_line_one.clone(), str::to_owned);
        if let Some(line_prefix) = node.line_prefix() {
            prefix_line_one.push_str(line_prefix);
            prefix_other_lines.push_str(line_prefix);
        }
        let config = node.descriptor();
        if prefix_other_lines.is_empty() {
            prefix_other_lines.push_str(config.prefix_other_lines_root_node);
        }

        let wrap_width = self
            .config
            .wrap_width
            .max(char_len(&prefix_other_lines).saturating_add(self.config.wrap_width_properties));
        let mut builder =
            PrefixedStringBuilder::new(prefix_line_one.clone(), prefix_other_lines.clone(), wrap_width);

        let mut children = node.get_children();
        let has_children = !children.is_empty();
        let property_prefix = if has_children {
            config.property_prefix_if_children
        } else {
            config.property_prefix_no_children
        };

        let mut description = node.to_description(parent);
        if is_single_line {
            description = description.replace('\n', "\\n");
        }
        if !config.before_name.is_empty() {
            builder.write(config.before_name, false);
        }
        let wrap_name = !is_single_line && node.allow_name_wrap();
        let wrap_description = !is_single_line && node.allow_wrap();
        let uppercase_title = node.style() == TreeStyle::Error;
        let name = node.name().map(|name| {
            if uppercase_title {
                name.to_uppercase()
            } else {
                name.to_owned()
            }
        });

        if description.is_empty() {
            if let Some(name) = name.as_deref().filter(|_| node.show_name()) {
                builder.write(name, wrap_name);
            }
        } else {
            let mut include_name = false;
            if let Some(name) = name.as_deref().filter(|n| !n.is_empty() && node.show_name()) {
                include_name = true;
                builder.write(name, wrap_name);
                if node.show_separator() {
                    builder.write(config.after_name, wrap_name);
                }
                let gap = if config.is_name_on_own_line || description.contains('\n') {
                    "\n"
                } else {
                    " "
                };
                builder.write(gap, wrap_name);
            }
            if !is_single_line && builder.requires_multiple_lines() && !builder.is_current_line_empty() {
                builder.write("\n", false);
            }
            if include_name {
                builder.increment_prefix_other_lines(property_prefix, true);
            }
            if uppercase_title {
                description = description.to_uppercase();
            }
            builder.write(description.trim_end(), wrap_description);
            if !include_name {
                builder.increment_prefix_other_lines(property_prefix, false);
            }
        }
        if !config.suffix_line_one.is_empty() {
            let width = self.stretch_width(builder.wrap_width());
            builder.write_stretched(config.suffix_line_one, width);
        }

        let mut properties: Vec<DiagnosticsNode> = node
            .get_properties()
            .iter()
            .filter(|property| !property.is_filtered(self.config.min_level))
            .cloned()
            .collect();
        if let Some(max) = self.config.max_descendants_truncatable_node {
            if node.allow_truncate() {
                if properties.len() > max {
                    properties.truncate(max);
                    properties.push(DiagnosticsNode::message("..."));
                }
                if children.len() > max {
                    let mut kept =
                        truncate_nodes(&children, max, self.config.local_project.as_ref());
                    kept.push(DiagnosticsNode::message("..."));
                    children = Cow::Owned(kept);
                }
            }
        }

        let empty_body_description = node.empty_body_description();
        if (!properties.is_empty() || !children.is_empty() || empty_body_description.is_some())
            && (node.show_separator() || !description.is_empty())
        {
            builder.write(config.after_description_if_body, false);
        }

        if config.line_break_properties {
            builder.write(config.line_break, false);
        }
        if !properties.is_empty() {
            builder.write(config.before_properties, false);
        }
        builder.increment_prefix_other_lines(config.body_indent, false);

        if let Some(empty_body) = empty_body_description {
            if properties.is_empty() && children.is_empty() && !prefix_line_one.is_empty() {
                builder.write(empty_body, false);
                if config.line_break_properties {
                    builder.write(config.line_break, false);
                }
            }
        }

        for (i, property) in properties.iter().enumerate() {
            if i > 0 {
                builder.write(config.property_separator, false);
            }
            let property_style = property.descriptor();
            if property.style().is_single_line() {
                let other = format!(
                    "{}{}",
                    property_style.child_link_space, property_style.prefix_other_lines
                );
                let rendered = self.render_with_prefix(
                    property,
                    property_style.prefix_line_one,
                    Some(&other),
                    Some(config),
                );
                builder.write(&rendered, false);
                let multi_line = rendered.contains('\n') || config.line_break_properties;
                if multi_line && !rendered.ends_with('\n') {
                    builder.write("\n", false);
                }
            } else {
                let base = builder.prefix_other_lines().to_owned();
                let line_one = format!("{base}{}", property_style.prefix_line_one);
                let other = format!(
                    "{base}{}{}",
                    property_style.child_link_space, property_style.prefix_other_lines
                );
                let rendered = self.render_with_prefix(property, &line_one, Some(&other), Some(config));
                builder.write_raw_lines(&rendered);
            }
        }
        if !properties.is_empty() {
            builder.write(config.after_properties, false);
        }
        builder.write(config.mandatory_after_properties, false);
        if !config.line_break_properties {
            builder.write(config.line_break, false);
        }

        let prefix_children_raw = format!("{prefix_other_lines}{}", config.body_indent);
        if children.is_empty()
            && config.add_blank_line_if_no_children
            && builder.requires_multiple_lines()
            && !builder.prefix_other_lines().trim_end().is_empty()
        {
            builder.write(config.line_break, false);
        }

        if !children.is_empty() && config.show_children {
            if config.is_blank_line_between_properties_and_children
                && !properties.is_empty()
                && child_descriptor(&children[0], config).is_blank_line_between_properties_and_children
            {
                builder.write(config.line_break, false);
            }
            builder.set_prefix_other_lines(prefix_other_lines.clone());

            let last = children.len() - 1;
            for (i, child) in children.iter().enumerate() {
                let child_config = child_descriptor(child, config);
                let (line_one, other, link) = if i == last {
                    (
                        format!("{prefix_children_raw}{}", child_config.prefix_last_child_line_one),
                        format!(
                            "{prefix_children_raw}{}{}",
                            child_config.child_link_space, child_config.prefix_other_lines
                        ),
                        child_config.child_link_space,
                    )
                } else {
                    let next_config = child_descriptor(&children[i + 1], config);
                    (
                        format!("{prefix_children_raw}{}", child_config.prefix_line_one),
                        format!(
                            "{prefix_children_raw}{}{}",
                            next_config.link_character, child_config.prefix_other_lines
                        ),
                        child_config.link_character,
                    )
                };
                let rendered = self.render_with_prefix(child, &line_one, Some(&other), Some(config));
                builder.write_raw_lines(&rendered);
                if !child_config.footer.is_empty() {
                    builder.set_prefix_other_lines(prefix_children_raw.clone());
                    builder.write(&format!("{link}{}", child_config.footer), false);
                    if !child_config.mandatory_footer.is_empty() {
                        let width = self.stretch_width(
                            builder
                                .wrap_width()
                                .max(self.config.wrap_width_properties.saturating_add(char_len(&other))),
                        );
                        builder.write_stretched(child_config.mandatory_footer, width);
                    }
                    builder.write(config.line_break, false);
                }
            }
        }

        if parent.is_none() && !config.mandatory_footer.is_empty() {
            let width = self.stretch_width(builder.wrap_width());
            builder.write_stretched(config.mandatory_footer, width);
            builder.write(config.line_break, false);
        }
        builder.build()
    }
}

/// Single-line and error-property children inherit the parent's layout.
fn child_descriptor<'a>(
    child: &DiagnosticsNode,
    parent: &'a StyleDescriptor,
) -> &'a StyleDescriptor {
    match child.style() {
        TreeStyle::SingleLine | TreeStyle::ErrorProperty => parent,
        style => style.descriptor(),
    }
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}
