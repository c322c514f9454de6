//! Standard block rules.
//!
//! Every rule has the [`BlockRuleFn`](super::BlockRuleFn) signature and is
//! registered by [`Ruler::with_defaults`](super::Ruler::with_defaults).

mod blockquote;
mod code;
mod fence;
mod heading;
mod hr;
mod lheading;
mod list;
mod paragraph;
mod reference;

pub use blockquote::blockquote;
pub use code::code;
pub use fence::fence;
pub use heading::heading;
pub use hr::hr;
pub use lheading::lheading;
pub use list::list;
pub use paragraph::paragraph;
pub use reference::reference;
