// Property tests for sentence coverage and token stability

use proptest::prelude::*;
use tokenize_uk::{default_tokenizer, tokenize_words};

const FRAGMENTS: &[&str] = &[
    "Київ", "вул.", "Хрещатик.", "В.", "І.", "В.І.Перебийніс", "-", "—", "5", "12.5", "+15,5", "20-річний",
    "м’яко", "пʼять", "’", "«", "»", "!", "?", "?!", ".", "…", "(", ")", "Геогра́фія", "info@lang.org.ua",
    "https://lang.org.ua/", "Так.", "ні", "ЕОМ", "т.д.", "№", "5kg",
];

const GAPS: &[&str] = &[" ", "  ", "\t", ""];
const TAILS: &[&str] = &["", " ", " \t"];

fn ukrainian_line() -> impl Strategy<Value = String> {
    let fragment = prop::sample::select(FRAGMENTS);
    let gap = prop::sample::select(GAPS);
    (prop::collection::vec((fragment, gap), 0..24), prop::sample::select(TAILS)).prop_map(
        |(parts, tail)| {
            let mut line: String = parts.into_iter().map(|(f, g)| format!("{f}{g}")).collect();
            line.push_str(tail);
            line
        },
    )
}

fn assert_sentence_coverage(line: &str) -> Result<(), TestCaseError> {
    let detected = default_tokenizer().segmenter().detect_sentences(line);
    prop_assert!(!detected.is_empty());

    if line.trim().is_empty() {
        prop_assert_eq!(detected.len(), 1);
        prop_assert_eq!(detected[0].raw(), line);
        return Ok(());
    }

    prop_assert_eq!(detected[0].span.start, 0);
    prop_assert_eq!(detected[detected.len() - 1].span.end, line.trim_end().len());

    let mut rebuilt = String::new();
    for (i, sentence) in detected.iter().enumerate() {
        prop_assert_eq!(sentence.index, i);
        prop_assert_eq!(sentence.raw(), &line[sentence.span.range()]);
        if let Some(next) = detected.get(i + 1) {
            let gap = &line[sentence.span.end..next.span.start];
            prop_assert!(!gap.is_empty());
            prop_assert!(gap.chars().all(char::is_whitespace));
            rebuilt.push_str(sentence.raw());
            rebuilt.push_str(gap);
        } else {
            rebuilt.push_str(sentence.raw());
        }
    }
    prop_assert_eq!(rebuilt.as_str(), line.trim_end());
    Ok(())
}

fn assert_tokens_stable(text: &str) -> Result<(), TestCaseError> {
    let tokens = tokenize_words(text);
    for token in &tokens {
        prop_assert_eq!(tokenize_words(token), vec![*token]);
    }

    let joined = tokens.join(" ");
    prop_assert_eq!(tokenize_words(&joined), tokens);
    Ok(())
}

proptest! {
    #[test]
    fn sentences_cover_ukrainian_lines(line in ukrainian_line()) {
        assert_sentence_coverage(&line)?;
    }

    #[test]
    fn sentences_cover_arbitrary_lines(line in "[^\n\r]{0,80}") {
        assert_sentence_coverage(&line)?;
    }

    #[test]
    fn tokens_stable_on_ukrainian_lines(line in ukrainian_line()) {
        assert_tokens_stable(&line)?;
    }

    #[test]
    fn tokens_stable_on_arbitrary_text(text in ".{0,80}") {
        assert_tokens_stable(&text)?;
    }
}
