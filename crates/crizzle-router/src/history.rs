use std::cell::RefCell;
use std::rc::Rc;

/// Failures reported by a history backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("history API is unavailable")]
    Unavailable,
    #[error("history rejected `{url}`: {reason}")]
    Rejected { url: String, reason: String },
}

/// The navigation stack the router writes to.
///
/// Locations are full URLs as shown to the user, including the base path,
/// query and fragment.
pub trait History {
    fn location(&self) -> String;
    fn push(&self, url: &str) -> Result<(), HistoryError>;
    fn replace(&self, url: &str) -> Result<(), HistoryError>;
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    index: usize,
}

/// In-memory history with back/forward, used off the browser and in tests.
///
/// Clones share the same stack, so a test can keep a handle while the router
/// owns another.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    stack: Rc<RefCell<Stack>>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            stack: Rc::new(RefCell::new(Stack {
                entries: vec![initial.into()],
                index: 0,
            })),
        }
    }

    /// Moves one entry back. Returns `false` at the start of the stack.
    pub fn back(&self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.index == 0 {
            return false;
        }
        stack.index -= 1;
        true
    }

    /// Moves one entry forward. Returns `false` at the end of the stack.
    pub fn forward(&self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.index + 1 >= stack.entries.len() {
            return false;
        }
        stack.index += 1;
        true
    }

    pub fn entries(&self) -> Vec<String> {
        self.stack.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let stack = self.stack.borrow();
        stack.entries[stack.index].clone()
    }

    fn push(&self, url: &str) -> Result<(), HistoryError> {
        let mut stack = self.stack.borrow_mut();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(url.to_string());
        stack.index = keep;
        Ok(())
    }

    fn replace(&self, url: &str) -> Result<(), HistoryError> {
        let mut stack = self.stack.borrow_mut();
        let index = stack.index;
        stack.entries[index] = url.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_discards_forward_entries() {
        let history = MemoryHistory::new("/");
        history.push("/data").unwrap();
        history.push("/docs").unwrap();
        assert!(history.back());
        assert_eq!(history.location(), "/data");

        history.push("/trading").unwrap();
        assert_eq!(history.entries(), vec!["/", "/data", "/trading"]);
        assert!(!history.forward());
    }

    #[test]
    fn replace_keeps_length() {
        let history = MemoryHistory::new("/");
        history.push("/data").unwrap();
        history.replace("/docs").unwrap();
        assert_eq!(history.entries(), vec!["/", "/docs"]);
        assert_eq!(history.location(), "/docs");
    }

    #[test]
    fn back_and_forward_stop_at_the_edges() {
        let history = MemoryHistory::default();
        assert!(!history.back());
        history.push("/docs").unwrap();
        assert!(history.back());
        assert!(history.forward());
        assert!(!history.forward());
        assert_eq!(history.location(), "/docs");
    }
}
