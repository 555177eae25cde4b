use crate::models::domain::{OptionLabel, QuizQuestion};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use std::collections::BTreeMap;

    /// Model output that contains no question delimiter at all
    pub const UNPARSEABLE_COMPLETION: &str =
        "I'm sorry, I can only help with questions about the provided material.";

    /// Creates a valid question with options 3/4/5/6 and answer B
    pub fn sample_question(text: &str) -> QuizQuestion {
        let options: BTreeMap<OptionLabel, String> = OptionLabel::ALL
            .into_iter()
            .zip(["3", "4", "5", "6"])
            .map(|(label, value)| (label, value.to_string()))
            .collect();

        QuizQuestion::new(text, options, OptionLabel::B, "2 plus 2 equals 4.")
            .expect("fixture question is valid")
    }

    /// Study material long enough to pass the default minimum length
    pub fn study_content() -> String {
        "Photosynthesis converts light energy into chemical energy. \
         It takes place in the chloroplasts of plant cells and releases oxygen."
            .to_string()
    }

    /// Two well-formed questions in the decorated layout the prompt asks for
    pub fn sample_completion() -> String {
        "Here are your questions:\n\n\
         📌 **Question 1:** Where does photosynthesis take place?\n\
         A) Mitochondria\n\
         B) Chloroplasts\n\
         C) Nucleus\n\
         D) Ribosomes\n\n\
         ✅ **Correct Answer:** B\n\
         💡 **Explanation:** Chloroplasts hold the pigments that capture light.\n\
         ━━━━━━━━━━━━━━━━━━━━━━━━\n\n\
         📌 **Question 2:** Which gas does photosynthesis release?\n\
         A) Nitrogen\n\
         B) Carbon dioxide\n\
         C) Oxygen\n\
         D) Helium\n\n\
         ✅ **Correct Answer:** C\n\
         💡 **Explanation:** Oxygen is released when water is split.\n\
         ━━━━━━━━━━━━━━━━━━━━━━━━\n"
            .to_string()
    }

    /// Three blocks where only the first is complete
    pub fn partial_completion() -> String {
        "Question 1: What powers photosynthesis?\n\
         A) Light\n\
         B) Sound\n\
         C) Heat\n\
         D) Wind\n\
         Correct Answer: A\n\
         Explanation: Light energy drives the reaction.\n\n\
         Question 2: What is missing here?\n\
         A) One\n\
         B) Two\n\
         C) Three\n\
         Correct Answer: A\n\
         Explanation: Option D was never written.\n\n\
         Question 3: Too short\n\
         A) x\n"
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::response_parser::parse_response;

    #[test]
    fn test_fixtures_sample_question() {
        let question = sample_question("What is 2+2?");
        assert_eq!(question.question(), "What is 2+2?");
        assert_eq!(question.correct_answer(), super::OptionLabel::B);
        assert_eq!(question.option(super::OptionLabel::B), "4");
    }

    #[test]
    fn test_fixture_completions_parse_as_described() {
        assert_eq!(parse_response(&sample_completion()).questions.len(), 2);

        let partial = parse_response(&partial_completion());
        assert_eq!(partial.questions.len(), 1);
        assert_eq!(partial.rejections.len(), 2);

        assert_eq!(parse_response(UNPARSEABLE_COMPLETION).block_count(), 0);
    }

    #[test]
    fn test_study_content_meets_default_minimum() {
        assert!(study_content().chars().count() >= 50);
    }
}
