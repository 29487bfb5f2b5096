use rustpython_parser::ast::{self, ExceptHandler, Expr, Pattern, Stmt};

use super::tree::{LoopKind, Node, NodeKind, Span};

macro_rules! span {
    ($node:expr) => {
        Span::new(
            usize::from($node.range.start()),
            usize::from($node.range.end()),
        )
    };
}

/// Lower a parsed module body into the analyzer tree. The root spans the whole text.
pub(super) fn lower_module(body: &[Stmt], text_len: usize) -> Node {
    Node::new(NodeKind::Other, Span::new(0, text_len), lower_suite(body))
}

fn lower_suite(body: &[Stmt]) -> Vec<Node> {
    body.iter().map(lower_stmt).collect()
}

fn lower_exprs(exprs: &[Expr]) -> Vec<Node> {
    exprs.iter().map(lower_expr).collect()
}

fn push_opt(children: &mut Vec<Node>, expr: Option<&Expr>) {
    if let Some(expr) = expr {
        children.push(lower_expr(expr));
    }
}

fn lower_stmt(stmt: &Stmt) -> Node {
    match stmt {
        Stmt::FunctionDef(f) => {
            let mut children = lower_arguments(&f.args);
            children.extend(lower_suite(&f.body));
            children.extend(lower_exprs(&f.decorator_list));
            push_opt(&mut children, f.returns.as_deref());
            let kind = NodeKind::FunctionDef {
                name: f.name.to_string(),
                is_async: false,
            };
            Node::new(kind, span!(f), children)
        }
        Stmt::AsyncFunctionDef(f) => {
            let mut children = lower_arguments(&f.args);
            children.extend(lower_suite(&f.body));
            children.extend(lower_exprs(&f.decorator_list));
            push_opt(&mut children, f.returns.as_deref());
            let kind = NodeKind::FunctionDef {
                name: f.name.to_string(),
                is_async: true,
            };
            Node::new(kind, span!(f), children)
        }
        Stmt::ClassDef(c) => {
            let mut children = lower_exprs(&c.bases);
            children.extend(c.keywords.iter().map(|k| lower_expr(&k.value)));
            children.extend(lower_suite(&c.body));
            children.extend(lower_exprs(&c.decorator_list));
            let kind = NodeKind::ClassDef {
                name: c.name.to_string(),
            };
            Node::new(kind, span!(c), children)
        }
        Stmt::Return(r) => {
            let mut children = Vec::new();
            push_opt(&mut children, r.value.as_deref());
            Node::new(NodeKind::Other, span!(r), children)
        }
        Stmt::Delete(d) => Node::new(NodeKind::Other, span!(d), lower_exprs(&d.targets)),
        Stmt::Assign(a) => {
            let mut children = lower_exprs(&a.targets);
            children.push(lower_expr(&a.value));
            Node::new(NodeKind::Other, span!(a), children)
        }
        Stmt::AugAssign(a) => {
            let children = vec![lower_expr(&a.target), lower_expr(&a.value)];
            Node::new(NodeKind::Other, span!(a), children)
        }
        Stmt::AnnAssign(a) => {
            let mut children = vec![lower_expr(&a.target), lower_expr(&a.annotation)];
            push_opt(&mut children, a.value.as_deref());
            Node::new(NodeKind::Other, span!(a), children)
        }
        Stmt::For(f) => {
            let mut children = vec![lower_expr(&f.target), lower_expr(&f.iter)];
            children.extend(lower_suite(&f.body));
            children.extend(lower_suite(&f.orelse));
            Node::new(NodeKind::Loop(LoopKind::For), span!(f), children)
        }
        Stmt::AsyncFor(f) => {
            let mut children = vec![lower_expr(&f.target), lower_expr(&f.iter)];
            children.extend(lower_suite(&f.body));
            children.extend(lower_suite(&f.orelse));
            Node::new(NodeKind::Loop(LoopKind::AsyncFor), span!(f), children)
        }
        Stmt::While(w) => {
            let mut children = vec![lower_expr(&w.test)];
            children.extend(lower_suite(&w.body));
            children.extend(lower_suite(&w.orelse));
            Node::new(NodeKind::Loop(LoopKind::While), span!(w), children)
        }
        Stmt::If(i) => {
            let mut children = vec![lower_expr(&i.test)];
            children.extend(lower_suite(&i.body));
            children.extend(lower_suite(&i.orelse));
            Node::new(NodeKind::Conditional, span!(i), children)
        }
        Stmt::With(w) => {
            let mut children = lower_with_items(&w.items);
            children.extend(lower_suite(&w.body));
            Node::new(NodeKind::With { is_async: false }, span!(w), children)
        }
        Stmt::AsyncWith(w) => {
            let mut children = lower_with_items(&w.items);
            children.extend(lower_suite(&w.body));
            Node::new(NodeKind::With { is_async: true }, span!(w), children)
        }
        Stmt::Match(m) => {
            let span = span!(m);
            let mut children = vec![lower_expr(&m.subject)];
            for case in &m.cases {
                let mut case_children = vec![lower_pattern(&case.pattern)];
                push_opt(&mut case_children, case.guard.as_deref());
                case_children.extend(lower_suite(&case.body));
                children.push(Node::new(NodeKind::Other, span, case_children));
            }
            Node::new(NodeKind::Other, span, children)
        }
        Stmt::Raise(r) => {
            let mut children = Vec::new();
            push_opt(&mut children, r.exc.as_deref());
            push_opt(&mut children, r.cause.as_deref());
            Node::new(NodeKind::Other, span!(r), children)
        }
        Stmt::Try(t) => lower_try(span!(t), &t.body, &t.handlers, &t.orelse, &t.finalbody),
        Stmt::TryStar(t) => {
            let node = lower_try(span!(t), &t.body, &t.handlers, &t.orelse, &t.finalbody);
            Node::new(NodeKind::Other, node.span, node.children)
        }
        Stmt::Assert(a) => {
            let mut children = vec![lower_expr(&a.test)];
            push_opt(&mut children, a.msg.as_deref());
            Node::new(NodeKind::Other, span!(a), children)
        }
        Stmt::Import(i) => {
            let names = i
                .names
                .iter()
                .filter_map(|alias| match &alias.asname {
                    Some(asname) => Some(asname.to_string()),
                    None => alias
                        .name
                        .as_str()
                        .split('.')
                        .next()
                        .filter(|head| !head.is_empty())
                        .map(str::to_string),
                })
                .collect();
            Node::leaf(NodeKind::Import { names }, span!(i))
        }
        Stmt::ImportFrom(i) => {
            let names = i
                .names
                .iter()
                .filter(|alias| alias.name.as_str() != "*")
                .map(|alias| alias.asname.as_ref().unwrap_or(&alias.name).to_string())
                .collect();
            Node::leaf(NodeKind::ImportFrom { names }, span!(i))
        }
        Stmt::Expr(e) => Node::new(NodeKind::Other, span!(e), vec![lower_expr(&e.value)]),
        // pass, break, continue, global, nonlocal, type aliases
        _ => Node::leaf(NodeKind::Other, Span::default()),
    }
}

fn lower_try(
    span: Span,
    body: &[Stmt],
    handlers: &[ExceptHandler],
    orelse: &[Stmt],
    finalbody: &[Stmt],
) -> Node {
    let mut children = lower_suite(body);
    for handler in handlers {
        let ExceptHandler::ExceptHandler(h) = handler;
        let mut handler_children = Vec::new();
        push_opt(&mut handler_children, h.type_.as_deref());
        handler_children.extend(lower_suite(&h.body));
        children.push(Node::new(NodeKind::Other, span!(h), handler_children));
    }
    children.extend(lower_suite(orelse));
    children.extend(lower_suite(finalbody));
    Node::new(NodeKind::Try, span, children)
}

fn lower_with_items(items: &[ast::WithItem]) -> Vec<Node> {
    let mut children = Vec::new();
    for item in items {
        children.push(lower_expr(&item.context_expr));
        push_opt(&mut children, item.optional_vars.as_deref());
    }
    children
}

/// Annotations and default values; parameter names themselves bind nothing we track.
fn lower_arguments(args: &ast::Arguments) -> Vec<Node> {
    let mut children = Vec::new();
    let with_defaults = || {
        args.posonlyargs
            .iter()
            .chain(&args.args)
            .chain(&args.kwonlyargs)
    };

    for arg in with_defaults() {
        push_opt(&mut children, arg.def.annotation.as_deref());
    }
    for arg in args.vararg.iter().chain(&args.kwarg) {
        push_opt(&mut children, arg.annotation.as_deref());
    }
    for arg in with_defaults() {
        push_opt(&mut children, arg.default.as_deref());
    }
    children
}

fn lower_comprehensions(generators: &[ast::Comprehension], span: Span) -> Vec<Node> {
    generators
        .iter()
        .map(|generator| {
            let mut children = vec![lower_expr(&generator.target), lower_expr(&generator.iter)];
            children.extend(lower_exprs(&generator.ifs));
            Node::new(NodeKind::Other, span, children)
        })
        .collect()
}

fn lower_expr(expr: &Expr) -> Node {
    match expr {
        Expr::BoolOp(b) => Node::new(NodeKind::Other, span!(b), lower_exprs(&b.values)),
        Expr::NamedExpr(n) => {
            let children = vec![lower_expr(&n.target), lower_expr(&n.value)];
            Node::new(NodeKind::Other, span!(n), children)
        }
        Expr::BinOp(b) => {
            let children = vec![lower_expr(&b.left), lower_expr(&b.right)];
            Node::new(NodeKind::Other, span!(b), children)
        }
        Expr::UnaryOp(u) => Node::new(NodeKind::Other, span!(u), vec![lower_expr(&u.operand)]),
        Expr::Lambda(l) => {
            let mut children = lower_arguments(&l.args);
            children.push(lower_expr(&l.body));
            Node::new(NodeKind::Other, span!(l), children)
        }
        Expr::IfExp(i) => {
            let children = vec![
                lower_expr(&i.test),
                lower_expr(&i.body),
                lower_expr(&i.orelse),
            ];
            Node::new(NodeKind::Other, span!(i), children)
        }
        Expr::Dict(d) => {
            let mut children: Vec<Node> = d.keys.iter().flatten().map(lower_expr).collect();
            children.extend(lower_exprs(&d.values));
            Node::new(NodeKind::Other, span!(d), children)
        }
        Expr::Set(s) => Node::new(NodeKind::Other, span!(s), lower_exprs(&s.elts)),
        Expr::List(l) => Node::new(NodeKind::Other, span!(l), lower_exprs(&l.elts)),
        Expr::Tuple(t) => Node::new(NodeKind::Other, span!(t), lower_exprs(&t.elts)),
        Expr::ListComp(c) => {
            let span = span!(c);
            let mut children = vec![lower_expr(&c.elt)];
            children.extend(lower_comprehensions(&c.generators, span));
            Node::new(NodeKind::Other, span, children)
        }
        Expr::SetComp(c) => {
            let span = span!(c);
            let mut children = vec![lower_expr(&c.elt)];
            children.extend(lower_comprehensions(&c.generators, span));
            Node::new(NodeKind::Other, span, children)
        }
        Expr::GeneratorExp(c) => {
            let span = span!(c);
            let mut children = vec![lower_expr(&c.elt)];
            children.extend(lower_comprehensions(&c.generators, span));
            Node::new(NodeKind::Other, span, children)
        }
        Expr::DictComp(c) => {
            let span = span!(c);
            let mut children = vec![lower_expr(&c.key), lower_expr(&c.value)];
            children.extend(lower_comprehensions(&c.generators, span));
            Node::new(NodeKind::Other, span, children)
        }
        Expr::Await(a) => Node::new(NodeKind::Other, span!(a), vec![lower_expr(&a.value)]),
        Expr::Yield(y) => {
            let mut children = Vec::new();
            push_opt(&mut children, y.value.as_deref());
            Node::new(NodeKind::Other, span!(y), children)
        }
        Expr::YieldFrom(y) => Node::new(NodeKind::Other, span!(y), vec![lower_expr(&y.value)]),
        Expr::Compare(c) => {
            let mut children = vec![lower_expr(&c.left)];
            children.extend(lower_exprs(&c.comparators));
            Node::new(NodeKind::Other, span!(c), children)
        }
        Expr::Call(c) => {
            let mut children = vec![lower_expr(&c.func)];
            children.extend(lower_exprs(&c.args));
            children.extend(c.keywords.iter().map(|k| lower_expr(&k.value)));
            Node::new(NodeKind::Call, span!(c), children)
        }
        Expr::FormattedValue(f) => {
            let mut children = vec![lower_expr(&f.value)];
            push_opt(&mut children, f.format_spec.as_deref());
            Node::new(NodeKind::Other, span!(f), children)
        }
        Expr::JoinedStr(j) => Node::new(NodeKind::Other, span!(j), lower_exprs(&j.values)),
        Expr::Attribute(a) => Node::new(NodeKind::Other, span!(a), vec![lower_expr(&a.value)]),
        Expr::Subscript(s) => {
            let children = vec![lower_expr(&s.value), lower_expr(&s.slice)];
            Node::new(NodeKind::Other, span!(s), children)
        }
        Expr::Starred(s) => Node::new(NodeKind::Other, span!(s), vec![lower_expr(&s.value)]),
        Expr::Name(n) => Node::leaf(NodeKind::Identifier(n.id.to_string()), span!(n)),
        Expr::Slice(s) => {
            let mut children = Vec::new();
            push_opt(&mut children, s.lower.as_deref());
            push_opt(&mut children, s.upper.as_deref());
            push_opt(&mut children, s.step.as_deref());
            Node::new(NodeKind::Other, span!(s), children)
        }
        // constants
        _ => Node::leaf(NodeKind::Other, Span::default()),
    }
}

fn lower_patterns(patterns: &[Pattern]) -> Vec<Node> {
    patterns.iter().map(lower_pattern).collect()
}

fn lower_pattern(pattern: &Pattern) -> Node {
    match pattern {
        Pattern::MatchValue(p) => Node::new(NodeKind::Other, span!(p), vec![lower_expr(&p.value)]),
        Pattern::MatchSequence(p) => {
            Node::new(NodeKind::Other, span!(p), lower_patterns(&p.patterns))
        }
        Pattern::MatchMapping(p) => {
            let mut children = lower_exprs(&p.keys);
            children.extend(lower_patterns(&p.patterns));
            Node::new(NodeKind::Other, span!(p), children)
        }
        Pattern::MatchClass(p) => {
            let mut children = vec![lower_expr(&p.cls)];
            children.extend(lower_patterns(&p.patterns));
            children.extend(lower_patterns(&p.kwd_patterns));
            Node::new(NodeKind::Other, span!(p), children)
        }
        Pattern::MatchAs(p) => {
            let children = p.pattern.iter().map(|inner| lower_pattern(inner)).collect();
            Node::new(NodeKind::Other, span!(p), children)
        }
        Pattern::MatchOr(p) => Node::new(NodeKind::Other, span!(p), lower_patterns(&p.patterns)),
        // singletons and star captures
        _ => Node::leaf(NodeKind::Other, Span::default()),
    }
}
