pub mod document;

pub use document::{
    default_document, Document, Education, Experience, Profile, Project, Theme,
};
