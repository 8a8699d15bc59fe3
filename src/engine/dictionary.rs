use super::EngineError;
use flate2::read::GzDecoder;
use fst::Map;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// One parsed line of the frequency resource. Immutable once indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    pub word: String,
    pub frequency: u64,
}

/// Word -> frequency table backing every other index.
///
/// The lookup side lives in an FST map (compact, O(word length) access); the
/// parsed entry list is kept alongside so the SymSpell and phonetic indices
/// can be built from it at startup. Never mutated after construction.
pub struct FrequencyDictionary {
    map: Map<Vec<u8>>,
    entries: Vec<DictEntry>,
}

/// Entries at or below this frequency are kept for "is this a known word"
/// checks but are too obscure to ever suggest.
pub const MIN_SUGGESTION_FREQUENCY: u64 = 1;

impl FrequencyDictionary {
    /// Load the frequency resource, preferring an explicit path, then the
    /// downloaded resource in the platform data dir, then the embedded
    /// fallback list. Load failures degrade to the fallback with a warning;
    /// they are never fatal.
    pub fn load(path: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match path {
            Some(p) => vec![p.to_path_buf()],
            None => Self::default_resource_paths(),
        };

        for candidate in &candidates {
            if !candidate.exists() {
                continue;
            }
            match Self::from_path(candidate) {
                Ok(dict) => return dict,
                Err(e) => {
                    eprintln!(
                        "Warning: failed to load dictionary {}: {}",
                        candidate.display(),
                        e
                    );
                }
            }
        }

        Self::embedded_fallback()
    }

    /// Parse a `word<space>frequency` resource file. Transparently handles
    /// gzip-compressed files by extension.
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let file = File::open(path).map_err(|source| EngineError::DictionaryRead {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            Self::from_reader(GzDecoder::new(file))
        } else {
            Self::from_reader(file)
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, EngineError> {
        let mut entries = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = match line {
                Ok(line) => line,
                // A bad byte sequence mid-file loses that line, not the load.
                Err(_) => continue,
            };
            if let Some(entry) = parse_line(&line) {
                entries.push(entry);
            }
        }
        Self::from_entries(entries)
    }

    /// Build directly from entries. Duplicates keep the highest frequency.
    pub fn from_entries(mut entries: Vec<DictEntry>) -> Result<Self, EngineError> {
        entries.sort_by(|a, b| a.word.cmp(&b.word).then(b.frequency.cmp(&a.frequency)));
        entries.dedup_by(|a, b| a.word == b.word);

        let map = Map::from_iter(entries.iter().map(|e| (e.word.as_bytes(), e.frequency)))
            .map_err(|e| EngineError::DictionaryBuild(e.to_string()))?;

        Ok(Self { map, entries })
    }

    fn embedded_fallback() -> Self {
        let dict = Self::from_reader(FALLBACK_WORDLIST.as_bytes())
            .expect("embedded fallback wordlist is well-formed");
        eprintln!(
            "Warning: no frequency dictionary found, using embedded fallback ({} words)",
            dict.len()
        );
        dict
    }

    fn default_resource_paths() -> Vec<PathBuf> {
        match crate::config::Config::data_dir() {
            Some(dir) => vec![dir.join("en.txt"), dir.join("en.txt.gz")],
            None => Vec::new(),
        }
    }

    /// Case-insensitive frequency lookup.
    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.map.get(word.to_lowercase().as_bytes())
    }

    /// True for any word present in the resource, however rare.
    pub fn is_known(&self, word: &str) -> bool {
        self.frequency(word).is_some()
    }

    /// Entries frequent enough to be offered as suggestions. The expensive
    /// indices are built from these only.
    pub fn suggestion_entries(&self) -> impl Iterator<Item = &DictEntry> {
        self.entries
            .iter()
            .filter(|e| e.frequency > MIN_SUGGESTION_FREQUENCY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse one resource line. Malformed lines and single-character words
/// (except "a"/"i") are skipped.
fn parse_line(line: &str) -> Option<DictEntry> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?.to_lowercase();
    let frequency: u64 = parts.next()?.parse().ok()?;

    if word.chars().count() < 2 && word != "a" && word != "i" {
        return None;
    }

    Some(DictEntry { word, frequency })
}

/// Minimal bundled wordlist so the engine still corrects common words when no
/// downloaded resource is available. Frequencies are web-corpus scale.
const FALLBACK_WORDLIST: &str = "\
the 23135851162
of 13151942776
and 12997637966
to 12136980858
a 9081174698
in 8469404971
for 5933321709
is 4705743816
on 3750423199
that 3400031103
by 3350048871
this 3228469771
with 3183110675
i 3086225277
you 2996181025
it 2813163874
not 2633487141
or 2590739907
be 2398724162
are 2393614870
from 2275595356
at 2272272772
as 2247431740
your 2062066547
all 2022459848
have 1563870997
new 1551258643
more 1544771673
an 1518266684
was 1483428678
we 1390661912
will 1356293641
home 1276852170
can 1242323499
us 1229112622
about 1226734006
if 1134987907
my 1060444427
has 1046748722
but 1041544768
our 1040268372
one 1020994604
other 978481319
do 950751722
no 937112320
they 904941358
he 891837222
up 883399892
may 875975004
what 858395966
which 810514085
their 782849411
out 760705661
use 743763693
any 711439301
there 701170205
see 681379371
so 661403009
his 660177731
when 650455817
here 649569319
who 630032657
also 616088406
now 611387736
get 595245870
am 576436203
been 575019382
would 572644147
how 571848080
were 570699558
me 566617666
some 565733929
these 541003397
its 525627757
like 520585287
than 502609275
had 496665982
should 487622580
her 486639947
such 479945165
then 477920992
them 475007245
she 471290537
many 470538866
well 471763837
only 457550139
very 445880117
still 423601459
work 419483948
people 415429840
because 410269313
go 408212139
good 406426732
know 397194720
much 389258338
time 380528752
mail 360396651
form 337245848
really 262973602
write 251441505
going 246089825
store 229141411
friend 135261173
receive 131928885
necessary 121823682
separate 95802870
writing 92570432
definitely 40642348
believe 121923621
before 310632386
after 372948094
think 313563376
said 312757195
does 311757793
each 304351379
want 281683036
right 280477217
just 280477217
first 578161543
made 303083206
find 577050517
where 557703894
most 556205581
world 552074372
";

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(lines: &str) -> FrequencyDictionary {
        FrequencyDictionary::from_reader(lines.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_and_lookup() {
        let d = dict("hello 1000\nworld 500\n");
        assert_eq!(d.frequency("hello"), Some(1000));
        assert_eq!(d.frequency("HELLO"), Some(1000));
        assert!(d.is_known("world"));
        assert!(!d.is_known("missing"));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let d = dict("good 10\nno_frequency\nbad notanumber\n\nalso 20\n");
        assert_eq!(d.len(), 2);
        assert!(d.is_known("good"));
        assert!(d.is_known("also"));
    }

    #[test]
    fn test_single_char_words_skipped_except_a_i() {
        let d = dict("a 100\ni 90\nx 80\nq 70\nok 60\n");
        assert!(d.is_known("a"));
        assert!(d.is_known("i"));
        assert!(!d.is_known("x"));
        assert!(!d.is_known("q"));
    }

    #[test]
    fn test_duplicates_keep_highest_frequency() {
        let d = dict("word 10\nword 500\nword 20\n");
        assert_eq!(d.frequency("word"), Some(500));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_rare_words_known_but_not_suggested() {
        let d = dict("common 1000\nobscure 1\n");
        assert!(d.is_known("obscure"));
        let suggestable: Vec<_> = d.suggestion_entries().map(|e| e.word.as_str()).collect();
        assert_eq!(suggestable, vec!["common"]);
    }

    #[test]
    fn test_embedded_fallback_loads() {
        let d = FrequencyDictionary::from_reader(FALLBACK_WORDLIST.as_bytes()).unwrap();
        assert!(d.is_known("the"));
        assert!(d.is_known("necessary"));
        assert!(d.len() > 100);
    }
}
