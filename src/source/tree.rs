use std::collections::VecDeque;

/// Byte range of a node within the text it was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    AsyncFor,
    While,
}

/// The closed set of node kinds the analyzers care about.
/// Everything else in the grammar lowers to `Other` but keeps its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `if` statement
    Conditional,
    Loop(LoopKind),
    /// `try`; `try ... except*` lowers to `Other`
    Try,
    With { is_async: bool },
    Call,
    /// Names bound by `import a.b` (`a`) or `import a.b as c` (`c`)
    Import { names: Vec<String> },
    /// Names bound by `from m import x` (`x`) or `from m import x as y` (`y`)
    ImportFrom { names: Vec<String> },
    /// A name reference, in load or store context
    Identifier(String),
    FunctionDef { name: String, is_async: bool },
    ClassDef { name: String },
    Other,
}

/// One node of the lowered syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span, children: Vec<Node>) -> Self {
        Self {
            kind,
            span,
            children,
        }
    }

    pub fn leaf(kind: NodeKind, span: Span) -> Self {
        Self::new(kind, span, Vec::new())
    }

    /// Direct children only, in source field order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Source text covered by this node, if the span is known and non-empty.
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source
            .get(self.span.start..self.span.end)
            .filter(|segment| !segment.is_empty())
    }

    /// Breadth-first iterator over this node and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            queue: VecDeque::from([self]),
        }
    }
}

pub struct Walk<'a> {
    queue: VecDeque<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children.iter());
        Some(node)
    }
}
