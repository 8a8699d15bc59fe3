use unicode_segmentation::UnicodeSegmentation;

/// A token of the input text together with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Word tokens (alphabetic, apostrophes kept inside words) with byte
/// offsets. Numbers and punctuation are not checkable words and are skipped.
pub fn word_tokens(text: &str) -> Vec<Token<'_>> {
    text.split_word_bound_indices()
        .filter(|(_, seg)| seg.chars().any(|c| c.is_alphabetic()))
        .map(|(start, seg)| Token {
            text: seg,
            start,
            end: start + seg.len(),
        })
        .collect()
}

/// Whitespace-separated tokens with byte offsets, punctuation attached.
/// The diff aligner works at this granularity so it can see the exact text
/// the model rewrote.
pub fn whitespace_tokens(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token {
                    text: &text[s..i],
                    start: s,
                    end: i,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            text: &text[s..],
            start: s,
            end: text.len(),
        });
    }

    tokens
}

/// Strip leading/trailing non-letters from a token, returning the core and
/// its byte span relative to the token start.
pub fn strip_punctuation(token: &str) -> (&str, usize, usize) {
    let start = token
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(start);

    (&token[start..end], start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokens_with_offsets() {
        let tokens = word_tokens("I recieve mail");
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["I", "recieve", "mail"]);
        assert_eq!(tokens[1].start, 2);
        assert_eq!(tokens[1].end, 9);
    }

    #[test]
    fn test_word_tokens_keep_contractions() {
        let tokens = word_tokens("don't stop");
        assert_eq!(tokens[0].text, "don't");
    }

    #[test]
    fn test_word_tokens_skip_numbers_and_punctuation() {
        let tokens = word_tokens("pay $40, ok?");
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["pay", "ok"]);
    }

    #[test]
    fn test_whitespace_tokens() {
        let tokens = whitespace_tokens("  go to  the store. ");
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["go", "to", "the", "store."]);
        assert_eq!(tokens[0].start, 2);
        assert_eq!(tokens[3].text, "store.");
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("store."), ("store", 0, 5));
        assert_eq!(strip_punctuation("\"quoted\","), ("quoted", 1, 7));
        assert_eq!(strip_punctuation("..."), ("", 3, 3));
    }
}
