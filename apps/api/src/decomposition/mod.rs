// Instruction decomposition: keyword-selected step lists rendered as micro-instructions.
// Stateless: a Decomposer only reads the shared RuleBook.

pub mod decomposer;
pub mod handlers;
