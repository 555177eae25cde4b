use crate::{
    constants::quiz_prompt::{CORRECT_ANSWER_MARKER, EXPLANATION_MARKER, QUESTION_MARKER},
    models::domain::{OptionLabel, QuizQuestion},
};

const RULE_WIDTH: usize = 50;
const DEFAULT_TITLE: &str = "Study Material";
const DEFAULT_FILE_STEM: &str = "practice";

/// Renders questions as the plain-text download. Identical input gives identical bytes.
pub fn export_questions(questions: &[QuizQuestion], topic: Option<&str>) -> String {
    let title = topic
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let mut out = format!("Practice Questions - {}\n{}\n\n", title, "=".repeat(RULE_WIDTH));

    for (idx, question) in questions.iter().enumerate() {
        out.push_str(&format!(
            "{} {}: {}\n",
            QUESTION_MARKER,
            idx + 1,
            question.question()
        ));
        for label in OptionLabel::ALL {
            out.push_str(&format!("{}) {}\n", label, question.option(label)));
        }
        out.push_str(&format!(
            "\n{} {}\n",
            CORRECT_ANSWER_MARKER,
            question.correct_answer()
        ));
        out.push_str(&format!(
            "{} {}\n\n",
            EXPLANATION_MARKER,
            question.explanation()
        ));
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push_str("\n\n");
    }

    out
}

/// Download name derived from the topic, e.g. `World_War_II_questions.txt`.
pub fn export_file_name(topic: Option<&str>) -> String {
    let stem: String = topic
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if stem.is_empty() {
        format!("{}_questions.txt", DEFAULT_FILE_STEM)
    } else {
        format!("{}_questions.txt", stem)
    }
}
