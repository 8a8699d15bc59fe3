use correx::engine::personal::{MemoryPersonalDictionary, PersonalDictionary};
use correx::engine::EngineError;
use correx::model::ModelAdapter;
use correx::{Config, CorrectionEngine, ErrorType, Source};
use std::io::Write;

const DICT: &str = "\
the 1000000
a 908117
i 3086225
of 1315194
it 281316
is 470574
my 1060444
mail 360396
form 337245
from 2275595
receive 131928
friend 135261
necessary 121823
go 408212
to 12136980
store 229141
";

fn dict_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DICT.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config_with(file: &tempfile::NamedTempFile) -> Config {
    Config {
        dictionary: Some(file.path().to_path_buf()),
        ..Config::default()
    }
}

/// Rewrites the scenario sentence the way the sequence model would.
struct ScenarioModel;

impl ModelAdapter for ScenarioModel {
    fn generate(&self, chunk: &str) -> Result<String, EngineError> {
        Ok(chunk
            .replace("recieve", "receive")
            .replace("form", "from")
            .replace("freind", "friend"))
    }
}

#[test]
fn scenario_three_corrections_with_exact_offsets() {
    let file = dict_file();
    let mut engine = CorrectionEngine::new(
        config_with(&file),
        Box::new(MemoryPersonalDictionary::new()),
    );
    engine.set_model_adapter(Box::new(ScenarioModel));

    let text = "I recieve mail form my freind";
    let corrections = engine.correct(text);

    let expected = [
        ("recieve", "receive", 2, 9),
        ("form", "from", 15, 19),
        ("freind", "friend", 23, 29),
    ];

    assert_eq!(corrections.len(), expected.len());
    for (correction, (original, suggested, start, end)) in corrections.iter().zip(expected) {
        assert_eq!(correction.original, original);
        assert_eq!(correction.suggested.to_lowercase(), suggested);
        assert_eq!(correction.start, start);
        assert_eq!(correction.end, end);
        assert_eq!(&text[correction.start..correction.end], original);
    }
}

#[test]
fn scenario_works_without_model_adapter() {
    let file = dict_file();
    let engine = CorrectionEngine::new(
        config_with(&file),
        Box::new(MemoryPersonalDictionary::new()),
    );

    let text = "I recieve mail form my freind";
    let corrections = engine.correct(text);

    // "form" is a known word, so the dictionary pipeline alone finds two.
    assert_eq!(corrections.len(), 2);
    assert_eq!(corrections[0].suggested, "receive");
    assert_eq!(corrections[1].suggested, "friend");
    assert!(corrections.iter().all(|c| c.source == Source::Rule));
}

#[test]
fn model_insertion_has_empty_span_after_preceding_word() {
    struct InsertTo;
    impl ModelAdapter for InsertTo {
        fn generate(&self, chunk: &str) -> Result<String, EngineError> {
            Ok(chunk.replace("go the", "go to the"))
        }
    }

    let file = dict_file();
    let mut engine = CorrectionEngine::new(
        config_with(&file),
        Box::new(MemoryPersonalDictionary::new()),
    );
    engine.set_model_adapter(Box::new(InsertTo));

    let text = "I go the store";
    let corrections = engine.correct(text);

    assert_eq!(corrections.len(), 1);
    let c = &corrections[0];
    assert!(c.is_insertion());
    assert_eq!(c.start, 4);
    assert_eq!(c.suggested, "to");
    assert_eq!(c.kind, ErrorType::FunctionWord);
    assert_eq!(c.source, Source::Model);
}

#[test]
fn personal_words_survive_every_pipeline() {
    struct FlagEverything;
    impl ModelAdapter for FlagEverything {
        fn generate(&self, chunk: &str) -> Result<String, EngineError> {
            Ok(chunk.replace("freind", "friend"))
        }
    }

    let file = dict_file();
    let mut personal = MemoryPersonalDictionary::new();
    personal.add("freind").unwrap();

    let mut engine = CorrectionEngine::new(config_with(&file), Box::new(personal));
    engine.set_model_adapter(Box::new(FlagEverything));

    let corrections = engine.correct("my freind is here");
    assert!(corrections.iter().all(|c| c.original != "freind"));
}

#[test]
fn failing_model_degrades_to_dictionary_pipeline() {
    struct AlwaysFails;
    impl ModelAdapter for AlwaysFails {
        fn generate(&self, _chunk: &str) -> Result<String, EngineError> {
            Err(EngineError::Model("inference server is down".to_string()))
        }
    }

    let file = dict_file();
    let mut engine = CorrectionEngine::new(
        config_with(&file),
        Box::new(MemoryPersonalDictionary::new()),
    );
    engine.set_model_adapter(Box::new(AlwaysFails));

    let corrections = engine.correct("I recieve mail");
    assert_eq!(corrections.len(), 1);
    assert_eq!(corrections[0].suggested, "receive");
}

#[test]
fn missing_dictionary_path_falls_back_to_embedded() {
    let config = Config {
        dictionary: Some("/nonexistent/path/to/dictionary.txt".into()),
        ..Config::default()
    };
    let engine = CorrectionEngine::new(config, Box::new(MemoryPersonalDictionary::new()));

    // The embedded fallback still knows very common words.
    let corrections = engine.correct("I recieve mail");
    assert!(corrections.iter().any(|c| c.suggested == "receive"));
}

#[test]
fn output_is_sorted_and_non_overlapping() {
    let file = dict_file();
    let mut engine = CorrectionEngine::new(
        config_with(&file),
        Box::new(MemoryPersonalDictionary::new()),
    );
    engine.set_model_adapter(Box::new(ScenarioModel));

    let corrections = engine.correct("I recieve mail form my freind and I recieve more");

    let mut last_end = 0;
    for c in &corrections {
        assert!(c.start >= last_end, "overlap detected");
        last_end = c.end.max(c.start);
    }
}
