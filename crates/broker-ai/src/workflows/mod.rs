pub mod leads;
pub mod mortgage;
pub mod scoring;
