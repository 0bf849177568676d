use super::RuleOperator;
use serde_json::Value;
use std::cmp::Ordering;

/// Compares a recorded answer against a rule's matching value.
///
/// Numbers compare as `f64` regardless of integer or float representation, strings
/// compare lexicographically and booleans only support equality. An array answer
/// (multiple selection) matches `eq` when it contains the matching value and `ne`
/// when it does not. Any other pairing is not comparable and never matches.
pub fn compare(answer: &Value, operator: RuleOperator, matching: &Value) -> bool {
    match operator {
        RuleOperator::Always => true,
        RuleOperator::Equal => eval_equality(answer, matching, |contained| contained),
        RuleOperator::NotEqual => eval_equality(answer, matching, |contained| !contained),
        RuleOperator::LessThan => eval_ordering(answer, matching, |o| o == Ordering::Less),
        RuleOperator::LessThanOrEqual => {
            eval_ordering(answer, matching, |o| o != Ordering::Greater)
        }
        RuleOperator::GreaterThan => eval_ordering(answer, matching, |o| o == Ordering::Greater),
        RuleOperator::GreaterThanOrEqual => {
            eval_ordering(answer, matching, |o| o != Ordering::Less)
        }
    }
}

fn eval_equality<F>(answer: &Value, matching: &Value, f: F) -> bool
where
    F: Fn(bool) -> bool,
{
    match answer {
        Value::Array(items) if !matching.is_array() => {
            f(items.iter().any(|item| scalar_equal(item, matching)))
        }
        _ => match scalar_ordering(answer, matching) {
            Some(ordering) => f(ordering == Ordering::Equal),
            None => match (answer, matching) {
                (Value::Bool(a), Value::Bool(b)) => f(a == b),
                (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
                    f(answer == matching)
                }
                _ => false,
            },
        },
    }
}

fn eval_ordering<F>(answer: &Value, matching: &Value, f: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    scalar_ordering(answer, matching).is_some_and(f)
}

fn scalar_equal(item: &Value, matching: &Value) -> bool {
    match scalar_ordering(item, matching) {
        Some(ordering) => ordering == Ordering::Equal,
        None => item == matching,
    }
}

/// Ordering for the ordered scalar pairings: number/number and string/string.
fn scalar_ordering(answer: &Value, matching: &Value) -> Option<Ordering> {
    match (answer, matching) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64()?, b.as_f64()?);
            a.partial_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
