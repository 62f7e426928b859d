// Declare submodules
mod common;
mod comparison;
mod extraction;

pub use common::*;
pub use comparison::common_table_prompt;
pub use extraction::{json_extraction_prompt, text_block_extraction_prompt};
