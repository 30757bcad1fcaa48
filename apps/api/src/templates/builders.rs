//! Fixed-layout prompt builders: chain-of-thought and few-shot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FewShotExample {
    pub input: String,
    pub output: String,
}

/// Task header, numbered reasoning steps, then a cue to work through them.
pub fn chain_of_thought_prompt(task: &str, steps: &[String]) -> String {
    let steps_text: Vec<String> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect();

    format!(
        "Task: {task}\n\nLet's break this down step by step:\n\n{}\n\nNow, let's work through each step:\n",
        steps_text.join("\n")
    )
}

/// Task header, Input/Output example pairs, then the query with an open `Output:` cue.
pub fn few_shot_prompt(task: &str, examples: &[FewShotExample], query: &str) -> String {
    let examples_text: Vec<String> = examples
        .iter()
        .map(|ex| format!("Input: {}\nOutput: {}", ex.input, ex.output))
        .collect();

    format!(
        "Task: {task}\n\nHere are some examples:\n\n{}\n\nNow, solve this:\nInput: {query}\nOutput:",
        examples_text.join("\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_of_thought_numbers_steps() {
        let steps = vec![
            "Calculate cost of apples: 3 × $2".to_string(),
            "Calculate cost of oranges: 2 × $3".to_string(),
            "Add both costs together".to_string(),
        ];
        let prompt = chain_of_thought_prompt("Total the fruit cost", &steps);
        assert!(prompt.starts_with("Task: Total the fruit cost\n\n"));
        assert!(prompt.contains(
            "1. Calculate cost of apples: 3 × $2\n2. Calculate cost of oranges: 2 × $3\n3. Add both costs together"
        ));
        assert!(prompt.contains("step by step"));
        assert!(prompt.ends_with("Now, let's work through each step:\n"));
    }

    #[test]
    fn test_few_shot_layout() {
        let examples = vec![
            FewShotExample {
                input: "2 + 2".to_string(),
                output: "4".to_string(),
            },
            FewShotExample {
                input: "5 × 3".to_string(),
                output: "15".to_string(),
            },
        ];
        let prompt = few_shot_prompt("Solve the math problem", &examples, "7 + 3");
        assert_eq!(
            prompt,
            "Task: Solve the math problem\n\nHere are some examples:\n\n\
             Input: 2 + 2\nOutput: 4\n\nInput: 5 × 3\nOutput: 15\n\n\
             Now, solve this:\nInput: 7 + 3\nOutput:"
        );
    }
}
