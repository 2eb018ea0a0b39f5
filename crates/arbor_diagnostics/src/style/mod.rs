//! Tree styles.
//!
//! Each [`TreeStyle`] maps to exactly one static [`StyleDescriptor`]: a bundle
//! of line-art tokens and layout flags. The renderer never branches on the
//! style itself (apart from single-line detection and error-title casing);
//! every visual difference between styles lives in these tables.

use std::fmt;

/// Named visual style of a node and its subtree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum TreeStyle {
    /// Sparse line art: `├─`, `└─`, `│`.
    #[default]
    Normal,
    /// Same skeleton as `Normal` with dashed connectors, for offstage content.
    Dashed,
    /// Single-character connectors with properties in parentheses.
    Dense,
    /// Rectangular border around each child: `╞═╦══ name ═══` … `╚═══════════`.
    Box,
    /// Pure indentation, used for nested structured property values.
    Whitespace,
    /// No line art, one line per property, no indentation.
    Flat,
    /// Name, header and properties comma-joined on one line; children suppressed.
    SingleLine,
    /// Root wrapper of an error report.
    Error,
    /// Name on its own line followed by the value; used for error properties.
    ErrorProperty,
    /// Like `Whitespace` but never shows children.
    Shallow,
    /// No decoration at all.
    None,
}

impl TreeStyle {
    /// Every style, in declaration order.
    pub const ALL: [TreeStyle; 11] = [
        TreeStyle::Normal,
        TreeStyle::Dashed,
        TreeStyle::Dense,
        TreeStyle::Box,
        TreeStyle::Whitespace,
        TreeStyle::Flat,
        TreeStyle::SingleLine,
        TreeStyle::Error,
        TreeStyle::ErrorProperty,
        TreeStyle::Shallow,
        TreeStyle::None,
    ];

    /// The singleton descriptor for this style.
    pub fn descriptor(self) -> &'static StyleDescriptor {
        match self {
            TreeStyle::Normal => &NORMAL,
            TreeStyle::Dashed => &DASHED,
            TreeStyle::Dense => &DENSE,
            TreeStyle::Box => &BOX,
            TreeStyle::Whitespace => &WHITESPACE,
            TreeStyle::Flat | TreeStyle::None => &FLAT,
            TreeStyle::SingleLine => &SINGLE_LINE,
            TreeStyle::Error => &ERROR,
            TreeStyle::ErrorProperty => &ERROR_PROPERTY,
            TreeStyle::Shallow => &SHALLOW,
        }
    }

    /// Whether nodes of this style render on a single line.
    #[inline]
    pub fn is_single_line(self) -> bool {
        matches!(self, TreeStyle::SingleLine)
    }

    /// Wire tag used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            TreeStyle::Normal => "normal",
            TreeStyle::Dashed => "dashed",
            TreeStyle::Dense => "dense",
            TreeStyle::Box => "box",
            TreeStyle::Whitespace => "whitespace",
            TreeStyle::Flat => "flat",
            TreeStyle::SingleLine => "singleLine",
            TreeStyle::Error => "error",
            TreeStyle::ErrorProperty => "errorProperty",
            TreeStyle::Shallow => "shallow",
            TreeStyle::None => "none",
        }
    }
}

impl fmt::Display for TreeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line-art tokens and layout flags for one style.
///
/// Pure data. Widths are measured in `char`s; every connector glyph used by
/// the built-in tables is a single `char`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StyleDescriptor {
    /// Prefix of the first line of a non-last child.
    pub prefix_line_one: &'static str,
    /// Prefix added to the remaining lines of a node.
    pub prefix_other_lines: &'static str,
    /// Prefix of the first line of the last child.
    pub prefix_last_child_line_one: &'static str,
    /// Prefix of lines after the first when the node is the root.
    pub prefix_other_lines_root_node: &'static str,
    /// Vertical link drawn past a sibling to reach the next one.
    pub link_character: &'static str,
    /// Blank of the same width as `link_character`.
    pub child_link_space: &'static str,
    /// Prefix of property lines when the node has children.
    pub property_prefix_if_children: &'static str,
    /// Prefix of property lines when the node has no children.
    pub property_prefix_no_children: &'static str,
    pub line_break: &'static str,
    /// Whether each property goes on its own line.
    pub line_break_properties: bool,
    pub before_name: &'static str,
    pub after_name: &'static str,
    /// Written after the header when a body (properties or children) follows.
    pub after_description_if_body: &'static str,
    pub before_properties: &'static str,
    pub after_properties: &'static str,
    pub mandatory_after_properties: &'static str,
    pub property_separator: &'static str,
    /// Extra indentation of the body relative to the header.
    pub body_indent: &'static str,
    /// Line written after a child of this style.
    pub footer: &'static str,
    /// Stretched line written after a child (or the root) of this style.
    pub mandatory_footer: &'static str,
    /// Stretched suffix of the first line.
    pub suffix_line_one: &'static str,
    pub show_children: bool,
    pub add_blank_line_if_no_children: bool,
    pub is_name_on_own_line: bool,
    pub is_blank_line_between_properties_and_children: bool,
}

/// Defaults every table overrides selectively.
const BASE: StyleDescriptor = StyleDescriptor {
    prefix_line_one: "",
    prefix_other_lines: "",
    prefix_last_child_line_one: "",
    prefix_other_lines_root_node: "",
    link_character: "",
    child_link_space: "",
    property_prefix_if_children: "",
    property_prefix_no_children: "",
    line_break: "\n",
    line_break_properties: true,
    before_name: "",
    after_name: ":",
    after_description_if_body: "",
    before_properties: "",
    after_properties: "",
    mandatory_after_properties: "",
    property_separator: "",
    body_indent: "",
    footer: "",
    mandatory_footer: "",
    suffix_line_one: "",
    show_children: true,
    add_blank_line_if_no_children: true,
    is_name_on_own_line: false,
    is_blank_line_between_properties_and_children: true,
};

pub static NORMAL: StyleDescriptor = StyleDescriptor {
    prefix_line_one: "├─",
    prefix_other_lines: " ",
    prefix_last_child_line_one: "└─",
    prefix_other_lines_root_node: " ",
    link_character: "│",
    child_link_space: " ",
    property_prefix_if_children: "│ ",
    property_prefix_no_children: "  ",
    ..BASE
};

pub static DASHED: StyleDescriptor = StyleDescriptor {
    prefix_line_one: "╎╌",
    prefix_other_lines: " ",
    prefix_last_child_line_one: "└╌",
    prefix_other_lines_root_node: " ",
    link_character: "╎",
    child_link_space: " ",
    property_prefix_if_children: "│ ",
    property_prefix_no_children: "  ",
    ..BASE
};

pub static DENSE: StyleDescriptor = StyleDescriptor {
    property_separator: ", ",
    before_properties: "(",
    after_properties: ")",
    line_break_properties: false,
    prefix_line_one: "├",
    prefix_other_lines: "",
    prefix_last_child_line_one: "└",
    link_character: "│",
    child_link_space: " ",
    property_prefix_if_children: "│",
    property_prefix_no_children: " ",
    prefix_other_lines_root_node: "",
    add_blank_line_if_no_children: false,
    is_blank_line_between_properties_and_children: false,
    ..BASE
};

pub static BOX: StyleDescriptor = StyleDescriptor {
    prefix_line_one: "╞═╦══ ",
    prefix_last_child_line_one: "╘═╦══ ",
    prefix_other_lines: " ║ ",
    footer: " ╚═══════════",
    link_character: "│",
    child_link_space: " ",
    after_name: " ═══",
    after_description_if_body: ":",
    body_indent: "  ",
    is_name_on_own_line: true,
    add_blank_line_if_no_children: false,
    is_blank_line_between_properties_and_children: false,
    ..BASE
};

pub static ERROR: StyleDescriptor = StyleDescriptor {
    prefix_line_one: "╞═╦",
    prefix_last_child_line_one: "╘═╦",
    prefix_other_lines: " ║ ",
    footer: " ╚═══════════",
    link_character: "│",
    child_link_space: " ",
    before_name: "══╡ ",
    suffix_line_one: " ╞══",
    mandatory_footer: "═════",
    add_blank_line_if_no_children: false,
    is_blank_line_between_properties_and_children: false,
    ..BASE
};

pub static WHITESPACE: StyleDescriptor = StyleDescriptor {
    prefix_other_lines: " ",
    prefix_other_lines_root_node: "  ",
    link_character: " ",
    child_link_space: " ",
    add_blank_line_if_no_children: false,
    after_description_if_body: ":",
    is_blank_line_between_properties_and_children: false,
    ..BASE
};

pub static FLAT: StyleDescriptor = StyleDescriptor {
    add_blank_line_if_no_children: false,
    is_blank_line_between_properties_and_children: false,
    ..BASE
};

pub static SINGLE_LINE: StyleDescriptor = StyleDescriptor {
    property_separator: ", ",
    before_properties: "(",
    after_properties: ")",
    line_break: "",
    line_break_properties: false,
    add_blank_line_if_no_children: false,
    show_children: false,
    property_prefix_if_children: "  ",
    property_prefix_no_children: "  ",
    ..BASE
};

pub static ERROR_PROPERTY: StyleDescriptor = StyleDescriptor {
    property_separator: ", ",
    before_properties: "(",
    after_properties: ")",
    line_break_properties: false,
    add_blank_line_if_no_children: false,
    show_children: false,
    property_prefix_if_children: "  ",
    property_prefix_no_children: "  ",
    is_name_on_own_line: true,
    ..BASE
};

pub static SHALLOW: StyleDescriptor = StyleDescriptor {
    prefix_other_lines: " ",
    prefix_other_lines_root_node: "  ",
    link_character: " ",
    child_link_space: " ",
    show_children: false,
    add_blank_line_if_no_children: false,
    after_description_if_body: ":",
    is_blank_line_between_properties_and_children: false,
    ..BASE
};
