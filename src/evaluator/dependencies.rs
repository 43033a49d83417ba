//! Dependency graph dumps.
//!
//! Tree form, one line per request:
//!
//! ```text
//!  `--TypeOf(3) (cached)
//!      `--InterfaceType(3) (cached)
//!      |   `--TypeOf(3) (cyclic dependency)
//!      `--Location(3)
//! ```

use std::fmt::{self, Write};

use crate::base::{SimpleDisplay, display_to_string};
use crate::request::AnyRequest;

use super::{Evaluator, FxIndexSet};

impl Evaluator {
    /// Print the dependency tree rooted at `request`.
    pub fn print_dependencies(&self, request: &AnyRequest, out: &mut dyn Write) -> fmt::Result {
        let mut visited_along_path = FxIndexSet::default();
        let mut prefix = String::new();
        self.print_dependencies_rec(request, out, &mut visited_along_path, &mut prefix, true)
    }

    /// The dependency tree rooted at `request`, as a string.
    pub fn dump_dependencies(&self, request: &AnyRequest) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.print_dependencies(request, &mut out);
        out
    }

    fn print_dependencies_rec(
        &self,
        request: &AnyRequest,
        out: &mut dyn Write,
        visited_along_path: &mut FxIndexSet<AnyRequest>,
        prefix: &mut String,
        last_child: bool,
    ) -> fmt::Result {
        write!(out, "{prefix} `--")?;
        request.simple_display(out)?;
        if self.is_cached(request) {
            out.write_str(" (cached)")?;
        }

        if !visited_along_path.insert(request.clone()) {
            return out.write_str(" (cyclic dependency)\n");
        }

        match self.dependencies.get(request) {
            Some(deps) if !deps.is_empty() => {
                out.write_char('\n')?;
                prefix.push(if last_child { ' ' } else { '|' });
                prefix.push_str("   ");
                let count = deps.len();
                for (index, dependency) in deps.iter().enumerate() {
                    self.print_dependencies_rec(
                        dependency,
                        out,
                        visited_along_path,
                        prefix,
                        index + 1 == count,
                    )?;
                }
                prefix.truncate(prefix.len() - 4);
            }
            _ => out.write_char('\n')?,
        }

        visited_along_path.pop();
        Ok(())
    }

    /// Print every recorded dependency edge as a Graphviz digraph.
    pub fn print_dependencies_graphviz(&self, out: &mut dyn Write) -> fmt::Result {
        let mut nodes: FxIndexSet<AnyRequest> = FxIndexSet::default();
        for (request, deps) in &self.dependencies {
            nodes.insert(request.clone());
            for dependency in deps {
                nodes.insert(dependency.clone());
            }
        }

        out.write_str("digraph Dependencies {\n")?;
        for (index, request) in nodes.iter().enumerate() {
            let label = escape_label(&display_to_string(request));
            if self.is_cached(request) {
                writeln!(out, "  request_{index} [label=\"{label}\", style=filled];")?;
            } else {
                writeln!(out, "  request_{index} [label=\"{label}\"];")?;
            }
        }
        out.write_char('\n')?;

        for (request, deps) in &self.dependencies {
            let Some(from) = nodes.get_index_of(request) else {
                continue;
            };
            for dependency in deps {
                if let Some(to) = nodes.get_index_of(dependency) {
                    writeln!(out, "  request_{from} -> request_{to};")?;
                }
            }
        }
        out.write_str("}\n")
    }
}

fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
