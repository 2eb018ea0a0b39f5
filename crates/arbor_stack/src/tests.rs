use super::*;

/// Minimal recursive tree, shaped like a chain of single-child wrappers.
struct Chain {
    child: Option<Box<Chain>>,
}

fn chain(depth: usize) -> Chain {
    let mut node = Chain { child: None };
    for _ in 0..depth {
        node = Chain {
            child: Some(Box::new(node)),
        };
    }
    node
}

fn depth_of(node: &Chain) -> usize {
    ensure_sufficient_stack(|| match &node.child {
        Some(child) => depth_of(child) + 1,
        None => 0,
    })
}

fn render_chain(node: &Chain, out: &mut String) {
    ensure_sufficient_stack(|| {
        out.push('└');
        if let Some(child) = &node.child {
            render_chain(child, out);
        }
    });
}

#[test]
fn test_shallow_traversal() {
    assert_eq!(depth_of(&chain(10)), 10);
}

#[test]
fn test_deep_traversal() {
    // Would overflow a default 8MB main-thread stack without growth.
    let tree = chain(100_000);
    assert_eq!(depth_of(&tree), 100_000);

    // Dropping a deep `Box` chain recurses too; unlink it iteratively.
    let mut next = tree.child;
    while let Some(mut node) = next {
        next = node.child.take();
    }
}

#[test]
fn test_mutable_capture() {
    let mut out = String::new();
    render_chain(&chain(3), &mut out);
    assert_eq!(out, "└└└└");
}

#[test]
fn test_returns_result() {
    let result: Result<usize, &str> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(result, Ok(7));
}
