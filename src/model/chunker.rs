/// Default per-chunk word budget, sized to keep a chunk plus its rewrite
/// safely inside the model's token window.
pub const DEFAULT_CHUNK_WORDS: usize = 80;

/// A contiguous slice of the input text queued for the model, carrying its
/// starting byte offset so downstream corrections can be translated back.
/// Chunks tile the input: concatenating them reconstructs it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl Chunk<'_> {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Split `text` into chunks of at most `budget` words, breaking at sentence
/// boundaries. A single sentence over the budget is split at word boundaries
/// only, never mid-word.
pub fn chunk_text(text: &str, budget: usize) -> Vec<Chunk<'_>> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let budget = budget.max(1);

    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    let mut chunk_words = 0;

    for (start, end) in sentence_spans(text) {
        let words = text[start..end].split_whitespace().count();

        if chunk_words > 0 && chunk_words + words > budget {
            chunks.push(Chunk {
                text: &text[chunk_start..start],
                start: chunk_start,
            });
            chunk_start = start;
            chunk_words = 0;
        }

        if words > budget {
            // Lone over-budget sentence: fall back to word-boundary splits.
            for piece in split_long_sentence(text, start, end, budget) {
                chunks.push(piece);
            }
            chunk_start = end;
            chunk_words = 0;
        } else {
            chunk_words += words;
        }
    }

    if chunk_start < text.len() {
        chunks.push(Chunk {
            text: &text[chunk_start..],
            start: chunk_start,
        });
    }

    chunks
}

/// Sentence spans tiling the whole text. A sentence ends after `.`, `!`, `?`
/// or a newline, with any following whitespace attached to it so that spans
/// stay contiguous.
fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let terminator = matches!(c, '.' | '!' | '?' | '\n');
        if !terminator {
            continue;
        }

        let after = i + c.len_utf8();
        let followed_by_space = after >= bytes.len()
            || text[after..]
                .chars()
                .next()
                .map(|n| n.is_whitespace())
                .unwrap_or(true);
        if c != '\n' && !followed_by_space {
            // "3.14", "e.g.x" — not a sentence break.
            continue;
        }

        let mut end = after;
        while let Some(&(j, n)) = chars.peek() {
            if n.is_whitespace() {
                end = j + n.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        spans.push((start, end));
        start = end;
    }

    if start < text.len() {
        spans.push((start, text.len()));
    }

    spans
}

/// Split one over-budget sentence at word boundaries into budget-sized
/// pieces that still tile the sentence's span.
fn split_long_sentence<'a>(
    text: &'a str,
    start: usize,
    end: usize,
    budget: usize,
) -> Vec<Chunk<'a>> {
    let sentence = &text[start..end];
    let mut word_starts = Vec::new();
    let mut in_word = false;

    for (i, c) in sentence.char_indices() {
        if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            word_starts.push(start + i);
            in_word = true;
        }
    }

    let mut pieces = Vec::new();
    let mut piece_start = start;
    let mut index = budget;

    while index < word_starts.len() {
        let boundary = word_starts[index];
        pieces.push(Chunk {
            text: &text[piece_start..boundary],
            start: piece_start,
        });
        piece_start = boundary;
        index += budget;
    }

    pieces.push(Chunk {
        text: &text[piece_start..end],
        start: piece_start,
    });

    pieces
}
