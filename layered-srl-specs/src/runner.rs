//! Runs a fixture through the fusion driver and compares the corpus it
//! produces against the fixture's expectations.

use std::sync::Arc;

use layered_srl::EmbeddingSource;
use layered_srl_pipeline::{FusionDriver, FusionError, FusionOutcome, FusionResult};

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{Expectations, SrlFixture};

/// Fuse the fixture's document against its scripted services.
pub async fn run_fixture(fixture: &SrlFixture) -> FusionResult<FusionOutcome> {
    let driver = FusionDriver::new(
        Arc::new(fixture.dependency_parser()),
        Arc::new(fixture.frame_parser()),
    )
    .with_config(fixture.config());

    let table = fixture.embedding_table();
    let embeddings = table.as_ref().map(|t| t as &dyn EmbeddingSource);
    driver.fuse_document(&fixture.document(), embeddings).await
}

/// Every way `result` differs from `expect`, one line each.
pub fn check_expectations(
    expect: &Expectations,
    result: &FusionResult<FusionOutcome>,
) -> Vec<String> {
    let mut mismatches = Vec::new();

    let outcome = match (result, expect.aborted_at) {
        (Err(FusionError::SentenceFailed { index, .. }), Some(expected)) => {
            if *index != expected {
                mismatches.push(format!(
                    "aborted at sentence {}, expected sentence {}",
                    index, expected
                ));
            }
            return mismatches;
        }
        (Err(err), _) => {
            mismatches.push(format!("run failed: {}", err));
            return mismatches;
        }
        (Ok(_), Some(expected)) => {
            mismatches.push(format!(
                "run completed, expected abort at sentence {}",
                expected
            ));
            return mismatches;
        }
        (Ok(outcome), None) => outcome,
    };

    let corpus = &outcome.corpus;

    if let Some(len) = expect.corpus_len {
        if corpus.len() != len {
            mismatches.push(format!("corpus has {} sentences, expected {}", corpus.len(), len));
        }
    }

    if let Some(heads) = &expect.heads {
        let actual: Vec<Vec<usize>> = corpus.iter().map(|s| s.heads().to_vec()).collect();
        compare(&mut mismatches, "heads", &actual, heads);
    }

    if let Some(senses) = &expect.senses {
        let actual: Vec<(usize, usize, String)> = corpus
            .iter()
            .enumerate()
            .flat_map(|(index, sentence)| {
                sentence.predicates().map(move |word| {
                    (
                        index,
                        word.position(),
                        word.sense().unwrap_or_default().to_string(),
                    )
                })
            })
            .collect();
        compare(&mut mismatches, "senses", &actual, senses);
    }

    if let Some(mentions) = &expect.mentions {
        let actual: Vec<(usize, usize, u32)> = corpus
            .mentions()
            .iter()
            .map(|(position, chain)| (position.sentence, position.token, *chain))
            .collect();
        compare(&mut mismatches, "mentions", &actual, mentions);
    }

    if let Some(failures) = &expect.failures {
        let actual: Vec<(usize, String)> = outcome
            .failures
            .iter()
            .map(|f| (f.index, f.stage.step().to_string()))
            .collect();
        compare(&mut mismatches, "failures", &actual, failures);
    }

    if let Some(embedded) = &expect.embedded {
        let actual: Vec<(usize, usize)> = corpus
            .iter()
            .enumerate()
            .flat_map(|(index, sentence)| {
                sentence
                    .tokens()
                    .filter(|word| word.embedding().is_some())
                    .map(move |word| (index, word.position()))
            })
            .collect();
        compare(&mut mismatches, "embedded", &actual, embedded);
    }

    mismatches
}

fn compare<T: PartialEq + std::fmt::Debug>(
    mismatches: &mut Vec<String>,
    field: &str,
    actual: &T,
    expected: &T,
) {
    if actual != expected {
        mismatches.push(format!("{}: got {:?}, expected {:?}", field, actual, expected));
    }
}

/// Run `fixture` and fail with every mismatch found.
pub async fn verify_fixture(name: &str, fixture: &SrlFixture) -> SpecResult<()> {
    let result = run_fixture(fixture).await;
    let mismatches = check_expectations(&fixture.expect, &result);
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(SpecError::Mismatch {
            fixture: name.to_string(),
            mismatches,
        })
    }
}
