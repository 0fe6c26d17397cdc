use crate::error::ImError;

const SEPARATOR: &str = "::";

/// Stack of name prefixes used to qualify widget labels into identifiers.
#[derive(Debug, Default)]
pub struct NamespaceStack {
    names: Vec<String>,
}

impl NamespaceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn push(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    /// Pops the innermost namespace, which must be `expected`.
    pub fn pop(&mut self, expected: &str) -> Result<(), ImError> {
        match self.names.last() {
            Some(top) if top == expected => {
                self.names.pop();
                Ok(())
            }
            found => Err(ImError::NamespaceCorrupted {
                expected: Some(expected.to_string()),
                found: found.cloned(),
            }),
        }
    }

    /// Qualifies a raw label with every open namespace.
    pub fn qualify(&self, label: &str) -> String {
        if self.names.is_empty() {
            return label.to_string();
        }
        let mut id = self.names.join(SEPARATOR);
        id.push_str(SEPARATOR);
        id.push_str(label);
        id
    }

    /// Errors unless the stack is empty.
    pub fn ensure_balanced(&self) -> Result<(), ImError> {
        match self.names.last() {
            None => Ok(()),
            Some(top) => Err(ImError::NamespaceCorrupted {
                expected: None,
                found: Some(top.clone()),
            }),
        }
    }

    pub fn truncate(&mut self, depth: usize) {
        self.names.truncate(depth);
    }
}
