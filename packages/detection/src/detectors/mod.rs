//! Detector implementations: the built-in pattern recognizer and the
//! remote statistical NER adapter.

pub mod ner;
pub mod pattern;

pub use ner::RemoteNerDetector;
pub use pattern::PatternDetector;
