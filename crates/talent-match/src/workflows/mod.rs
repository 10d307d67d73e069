pub mod guardrails;
pub mod matching;
