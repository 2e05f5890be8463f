//! Domain logic: the analysis pipeline and its extraction machinery.

pub mod analysis;
pub mod extraction;
