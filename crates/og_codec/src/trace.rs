//! Provide the thread-local tag stack behind the `debug` feature.
//!
//! While a walk is in flight the stack holds the chain of tags
//! currently being encoded or decoded; a fatal error captures it so a
//! failure deep inside a large graph names its position. Outside
//! `debug_assertions` builds, or without the `debug` feature, every
//! item here compiles to nothing.

#[cfg(all(debug_assertions, feature = "debug"))]
use core::cell::RefCell;

#[cfg(all(debug_assertions, feature = "debug"))]
thread_local! {
    static TAG_STACK: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

// -----------------------------------------------------------------------------
// TagGuard

/// A scope marker pushing one tag onto the thread-local stack.
///
/// Dropping the guard pops the tag again, so the stack always mirrors
/// the walk's current position, even on the error path.
#[must_use]
pub(crate) struct TagGuard;

impl TagGuard {
    #[cfg(all(debug_assertions, feature = "debug"))]
    pub(crate) fn enter(tag: &str) -> Self {
        TAG_STACK.with_borrow_mut(|stack| stack.push(tag.to_owned()));
        Self
    }

    #[cfg(not(all(debug_assertions, feature = "debug")))]
    #[inline(always)]
    pub(crate) fn enter(_tag: &str) -> Self {
        Self
    }
}

#[cfg(all(debug_assertions, feature = "debug"))]
impl Drop for TagGuard {
    fn drop(&mut self) {
        TAG_STACK.with_borrow_mut(|stack| {
            stack.pop();
        });
    }
}

// -----------------------------------------------------------------------------
// capture

/// Renders the current stack as `A > B > C`, or `None` when it is
/// empty or tracking is compiled out.
#[cfg(all(debug_assertions, feature = "debug"))]
pub(crate) fn capture() -> Option<Box<str>> {
    TAG_STACK.with_borrow(|stack| {
        if stack.is_empty() {
            None
        } else {
            Some(stack.join(" > ").into_boxed_str())
        }
    })
}

#[cfg(not(all(debug_assertions, feature = "debug")))]
#[inline(always)]
pub(crate) fn capture() -> Option<Box<str>> {
    None
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, debug_assertions, feature = "debug"))]
mod tests {
    use super::*;

    #[test]
    fn guards_nest_and_unwind() {
        assert_eq!(capture(), None);
        {
            let _outer = TagGuard::enter("Person");
            let _inner = TagGuard::enter("Integer");
            assert_eq!(capture().as_deref(), Some("Person > Integer"));
        }
        assert_eq!(capture(), None);
    }
}
