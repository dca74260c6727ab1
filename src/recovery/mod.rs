//! Fallback chains that run after generic parsing.
//!
//! Both chains are ordered lists of independent strategies. Each strategy
//! either produces a value or reports that it found nothing, and the first
//! value wins:
//!
//! - [`text`]: recovers body text when the boilerplate parser came back empty
//! - [`date`]: picks a publication year from the most authoritative source available

pub mod date;
pub mod text;
