//! Purpose: Select which dotted field paths the renderers emit.
//! Exports: `FieldFilter`.
//! Role: Shared by the text and JSON renderers so `--field` behaves the same in both.
//! Invariants: An empty filter selects every field.
//! Invariants: Selecting a path also selects its ancestors (to reach it) and its descendants.

#[derive(Clone, Debug, Default)]
pub(crate) struct FieldFilter {
    paths: Vec<String>,
}

impl FieldFilter {
    pub(crate) fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    pub(crate) fn paths(&self) -> &[String] {
        &self.paths
    }

    pub(crate) fn selects(&self, path: &str) -> bool {
        if self.paths.is_empty() {
            return true;
        }
        self.paths.iter().any(|wanted| {
            wanted == path || is_descendant(path, wanted) || is_descendant(wanted, path)
        })
    }
}

fn is_descendant(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('.'))
}
