mod common;

mod artifact;
mod assembly;
