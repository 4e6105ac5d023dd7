//! Graphviz DOT export.

use std::io::BufWriter;

use crate::combination::Combination;
use crate::common::{HashSet, NodeId};
use crate::function::BooleanFunction;
use crate::nodes::{Node, NodePtr, NodeRef};

pub trait Dot {
    fn dot<T>(&self, io: &mut T)
    where
        T: std::io::Write,
    {
        let s1 = "digraph { layout=dot; overlap=false; splines=true; node [fontsize=10];\n";
        let s2 = "}\n";
        let mut visited: HashSet<NodeId> = HashSet::default();
        io.write_all(s1.as_bytes()).unwrap();
        self.dot_impl(io, &mut visited);
        io.write_all(s2.as_bytes()).unwrap();
    }

    fn dot_string(&self) -> String {
        let mut buf = vec![];
        {
            let mut io = BufWriter::new(&mut buf);
            self.dot(&mut io);
        }
        std::str::from_utf8(&buf).unwrap().to_string()
    }

    fn dot_impl<T>(&self, io: &mut T, visited: &mut HashSet<NodeId>)
    where
        T: std::io::Write;
}

fn dot_node<T>(io: &mut T, node: &NodePtr, visited: &mut HashSet<NodeId>)
where
    T: std::io::Write,
{
    if visited.contains(&node.id()) {
        return;
    }
    match &**node {
        Node::Zero => {
            let s = format!("\"obj{}\" [shape=square, label=\"0\"];\n", node.id());
            io.write_all(s.as_bytes()).unwrap();
        }
        Node::One => {
            let s = format!("\"obj{}\" [shape=square, label=\"1\"];\n", node.id());
            io.write_all(s.as_bytes()).unwrap();
        }
        Node::NonTerminal(fnode) => {
            let s = format!(
                "\"obj{}\" [shape=circle, label=\"{}\"];\n",
                fnode.id(),
                fnode.label()
            );
            io.write_all(s.as_bytes()).unwrap();
            for (i, child) in fnode.iter().enumerate() {
                dot_node(io, child, visited);
                let s = format!(
                    "\"obj{}\" -> \"obj{}\" [label=\"{}\"];\n",
                    fnode.id(),
                    child.id(),
                    i
                );
                io.write_all(s.as_bytes()).unwrap();
            }
        }
    };
    visited.insert(node.id());
}

impl Dot for BooleanFunction {
    fn dot_impl<T>(&self, io: &mut T, visited: &mut HashSet<NodeId>)
    where
        T: std::io::Write,
    {
        dot_node(io, self.root(), visited);
    }
}

impl Dot for Combination {
    fn dot_impl<T>(&self, io: &mut T, visited: &mut HashSet<NodeId>)
    where
        T: std::io::Write,
    {
        dot_node(io, self.root(), visited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Label;

    const X: Label = 'x' as Label;
    const Y: Label = 'y' as Label;

    #[test]
    fn dot_terminal() {
        let s = BooleanFunction::one().dot_string();
        assert!(s.starts_with("digraph {"));
        assert!(s.contains("[shape=square, label=\"1\"];"));
        assert!(s.ends_with("}\n"));
    }

    #[test]
    fn dot_emits_each_node_once() {
        let x = BooleanFunction::var(X);
        let y = BooleanFunction::var(Y);
        let f = &x ^ &y;
        let s = f.dot_string();
        assert_eq!(s.matches("[shape=circle").count(), f.node_count() - 2);
        assert_eq!(s.matches("[shape=square").count(), 2);
    }

    #[test]
    fn dot_combination() {
        let x = Combination::item(X);
        let s = x.dot_string();
        assert!(s.contains(&format!("label=\"{}\"", X)));
        assert!(s.contains("->"));
    }
}
