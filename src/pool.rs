//! Thread-local parser pooling.
//!
//! Keeps one reusable [`SourceParser`] per language per thread. A parser is
//! created on first use for its language and reused by every later parse on
//! the same thread.

use crate::ts::{SourceParser, SupportLang, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static PARSERS: RefCell<Vec<SourceParser>> = const { RefCell::new(Vec::new()) };
}

/// Execute function with the pooled parser for `language`.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use doc_locator::pool::with_parser;
/// use doc_locator::ts::SupportLang;
///
/// let _tree = with_parser(SupportLang::Rust, |parser| parser.parse("fn main() {}"))??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(language: SupportLang, f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut SourceParser) -> R,
{
    PARSERS.with(|cell| {
        let mut parsers = cell.borrow_mut();
        let index = match parsers.iter().position(|p| p.language() == language) {
            Some(index) => index,
            None => {
                parsers.push(SourceParser::new(language)?);
                parsers.len() - 1
            }
        };
        Ok(f(&mut parsers[index]))
    })
}

/// Number of parsers pooled on the current thread.
pub fn pooled_count() -> usize {
    PARSERS.with(|cell| cell.borrow().len())
}
