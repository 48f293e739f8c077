//! Language model infrastructure - local GPT-2 checkpoint

mod gpt2;
mod local;

pub use gpt2::{Gpt2, Gpt2Config};
pub use local::{LocalGpt2Model, CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE};
