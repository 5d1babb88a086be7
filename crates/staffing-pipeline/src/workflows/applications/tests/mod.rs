mod common;
mod resolver;
