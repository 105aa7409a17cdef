pub(crate) mod bootstrap;
mod town;
