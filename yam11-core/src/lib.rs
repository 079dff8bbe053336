#![no_std]
extern crate alloc;
extern crate core;
extern crate yam11_common;

pub use emitter::{Emitter, EmitterOptions};
pub use tokenizer::{Parser, Reader, Scanner, Source};
pub use treebuild::{Document, Node, NodeData, NodeId, YamlEmitter, YamlLoader};

pub mod emitter;
pub mod escaper;
pub mod tokenizer;
pub mod treebuild;
