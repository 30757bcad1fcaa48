// Built-in rule tables. Every table here can be overridden by a RuleBook JSON file.

/// Ordered decomposition patterns: first keyword found in the instruction wins.
pub const DECOMPOSITION_PATTERNS: &[(&str, &[&str])] = &[
    (
        "analyze",
        &[
            "identify key elements",
            "examine relationships",
            "evaluate significance",
            "draw conclusions",
        ],
    ),
    (
        "create",
        &[
            "understand requirements",
            "plan structure",
            "generate content",
            "refine output",
        ],
    ),
    (
        "compare",
        &[
            "identify items to compare",
            "list characteristics",
            "find similarities",
            "find differences",
            "summarize comparison",
        ],
    ),
    (
        "explain",
        &[
            "identify the concept",
            "break into components",
            "provide examples",
            "summarize",
        ],
    ),
    (
        "solve",
        &[
            "understand the problem",
            "identify constraints",
            "explore solutions",
            "implement solution",
            "verify result",
        ],
    ),
];

/// Used when no decomposition keyword matches.
pub const DEFAULT_STEPS: &[&str] = &[
    "understand the task requirements",
    "identify key information needed",
    "process the information systematically",
    "generate the response",
    "review and refine the output",
];

pub const FORMAT_INDICATORS: &[&str] = &[
    "format:",
    "output:",
    "respond with",
    "return",
    "json",
    "markdown",
    "bullet",
    "numbered",
];

pub const SPECIFICITY_TERMS: &[&str] = &["specific", "exactly", "must", "should", "requirement"];

pub const CHAIN_OF_THOUGHT_TRIGGER: &str = "step by step";
pub const CHAIN_OF_THOUGHT_SENTENCE: &str = "Think through this step by step.";

pub const ROLE_TRIGGERS: &[&str] = &["you are", "act as", "as a"];
pub const ROLE_PREAMBLE: &str = "You are a helpful AI assistant.";

/// (triggers, suggestion): the suggestion is added when no trigger is present.
pub type Check = (&'static [&'static str], &'static str);

pub const GENERAL_CHECKS: &[Check] = &[(&["clear", "concise"], "Provide a clear and concise response.")];

pub const CODING_HEADING: &str = "Additional requirements";
pub const CODING_CHECKS: &[Check] = &[
    (&["comment"], "Include comments explaining the code."),
    (&["error"], "Handle potential errors appropriately."),
    (&["example"], "Provide usage examples."),
];

pub const ANALYSIS_HEADING: &str = "Analysis guidelines";
pub const ANALYSIS_CHECKS: &[Check] = &[
    (&["evidence"], "Support your analysis with evidence."),
    (&["consider"], "Consider multiple perspectives."),
    (&["conclusion"], "Provide a clear conclusion."),
];

pub const CREATIVE_HEADING: &str = "Creative guidelines";
pub const CREATIVE_CHECKS: &[Check] = &[
    (&["original"], "Be original and creative."),
    (&["engaging"], "Make the content engaging."),
];

// Each suffix carries a format indicator so the output-format rule fires at most once.
pub const GENERAL_FORMAT: &str = "Format: provide a well-structured response.";
pub const CODING_FORMAT: &str =
    "Output format:\n1. Code block with the solution\n2. Brief explanation\n3. Usage example";
pub const ANALYSIS_FORMAT: &str =
    "Output format:\n1. Summary\n2. Key findings\n3. Detailed analysis\n4. Conclusion";
pub const CREATIVE_FORMAT: &str = "Format: shape the response to suit the creative content.";
