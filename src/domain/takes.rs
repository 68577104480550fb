use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// One attempt within a round. Only `valid` is consulted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Take {
    #[serde(default)]
    pub valid: Value,
}

impl Take {
    pub fn is_valid(&self) -> bool {
        is_truthy(&self.valid)
    }
}

pub type Round = Vec<Take>;

/// Where the first valid take was found. All positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidAnswer {
    pub round: usize,
    pub take_in_round: usize,
    pub total_takes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub test_name: String,
    pub num_rounds: usize,
    pub valid_answer: Option<ValidAnswer>,
}

impl TestOutcome {
    pub fn finished_with_valid_answer(&self) -> bool {
        self.valid_answer.is_some()
    }
}

pub fn analyze_test(test_name: &str, rounds: &[Round]) -> TestOutcome {
    let mut total_takes = 0;
    let mut valid_answer = None;

    'rounds: for (round_idx, takes) in rounds.iter().enumerate() {
        for (take_idx, take) in takes.iter().enumerate() {
            total_takes += 1;
            if take.is_valid() {
                valid_answer = Some(ValidAnswer {
                    round: round_idx + 1,
                    take_in_round: take_idx + 1,
                    total_takes,
                });
                break 'rounds;
            }
        }
    }

    TestOutcome {
        test_name: test_name.to_string(),
        num_rounds: rounds.len(),
        valid_answer,
    }
}

/// Runs [`analyze_test`] over every test in the document, in the document's key order.
pub fn analyze_takes(document: &Value) -> AppResult<Vec<TestOutcome>> {
    let tests: &Map<String, Value> = document.as_object().ok_or_else(|| {
        AppError::InvalidInput("expected a JSON object keyed by test name".to_string())
    })?;

    tests
        .iter()
        .map(|(name, rounds)| {
            let rounds = Vec::<Round>::deserialize(rounds).map_err(|err| {
                AppError::InvalidInput(format!("test '{name}' is not a list of rounds: {err}"))
            })?;
            Ok(analyze_test(name, &rounds))
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rounds(value: Value) -> Vec<Round> {
        Vec::<Round>::deserialize(&value).unwrap()
    }

    #[test]
    fn finds_first_valid_take_across_rounds() {
        let data = rounds(json!([
            [{"valid": false}, {"valid": false}],
            [{"valid": false}, {"valid": true}, {"valid": true}],
            [{"valid": true}]
        ]));
        let outcome = analyze_test("t1", &data);
        assert_eq!(outcome.num_rounds, 3);
        assert_eq!(
            outcome.valid_answer,
            Some(ValidAnswer {
                round: 2,
                take_in_round: 2,
                total_takes: 4,
            })
        );
    }

    #[test]
    fn reports_missing_valid_answer() {
        let data = rounds(json!([[{"valid": false}], [{}], []]));
        let outcome = analyze_test("t2", &data);
        assert_eq!(outcome.num_rounds, 3);
        assert!(!outcome.finished_with_valid_answer());
    }

    #[test]
    fn empty_rounds_list_has_no_answer() {
        let outcome = analyze_test("t3", &[]);
        assert_eq!(outcome.num_rounds, 0);
        assert_eq!(outcome.valid_answer, None);
    }

    #[test]
    fn valid_flag_uses_truthiness() {
        let truthy = [json!(true), json!(1), json!("yes"), json!([0]), json!({"a": 1})];
        let falsy = [json!(false), json!(null), json!(0), json!(0.0), json!(""), json!([]), json!({})];
        for value in truthy {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
        for value in falsy {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
    }

    #[test]
    fn extra_take_fields_are_ignored() {
        let data = rounds(json!([[{"valid": true, "patch": "...", "score": 3}]]));
        let answer = analyze_test("t4", &data).valid_answer.unwrap();
        assert_eq!((answer.round, answer.take_in_round, answer.total_takes), (1, 1, 1));
    }

    #[test]
    fn document_order_is_preserved() {
        let document = json!({
            "zeta": [[{"valid": true}]],
            "alpha": [[{"valid": false}]],
        });
        let outcomes = analyze_takes(&document).unwrap();
        let names: Vec<_> = outcomes.iter().map(|o| o.test_name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(outcomes[0].finished_with_valid_answer());
        assert!(!outcomes[1].finished_with_valid_answer());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            analyze_takes(&json!([1, 2])),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            analyze_takes(&json!({"t": "not rounds"})),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            analyze_takes(&json!({"t": [[42]]})),
            Err(AppError::InvalidInput(_))
        ));
    }
}
