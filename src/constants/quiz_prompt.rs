// Literal markers shared by the prompt template and the response parser.
// Changing one side without the other breaks parsing.
pub const QUESTION_MARKER: &str = "Question";
pub const CORRECT_ANSWER_MARKER: &str = "Correct Answer:";
pub const EXPLANATION_MARKER: &str = "Explanation:";
pub const QUESTION_SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━";

pub const QUIZ_GENERATION_PREAMBLE: &str = "You are an expert educator creating practice questions.";

pub const QUIZ_GENERATION_RULES: &str = "CRITICAL RULES:
1. Questions must test understanding and critical thinking, not just memorization
2. All four options (A, B, C, D) must be plausible - no obviously wrong answers
3. Base questions ONLY on information from the provided content
4. Provide clear, educational explanations (2-3 sentences)
5. Vary difficulty levels appropriately
6. Only ONE option may be correct";
